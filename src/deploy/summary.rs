// src/deploy/summary.rs

//! Operator cheat-sheet printed at the end of a run.
//!
//! Ready-to-paste follow-up commands parameterized by the target and the
//! remote directory, including the `-i` key flag when one was given.

use crate::config::ConfigFile;
use crate::exec::Target;

/// Render the follow-up command list.
pub fn cheat_sheet(target: &Target, cfg: &ConfigFile) -> String {
    let ssh = ssh_prefix(target);
    let name = &cfg.service.name;
    let dir = &cfg.remote.dir;

    let mut out = String::from("----- follow-up commands -----\n");
    out.push_str(&format!("status:       {ssh} 'systemctl status {name}'\n"));
    out.push_str(&format!("journal:      {ssh} 'journalctl -u {name} -f'\n"));
    out.push_str(&format!(
        "bot log:      {ssh} 'tail -f {dir}/{}'\n",
        cfg.service.log_file
    ));
    out.push_str(&format!("stop:         {ssh} 'sudo systemctl stop {name}'\n"));
    out.push_str(&format!(
        "restart:      {ssh} 'sudo systemctl restart {name}'\n"
    ));
    out.push_str(&format!(
        "edit config:  {ssh} -t 'nano {dir}/{} && sudo systemctl restart {name}'\n",
        cfg.payload.bot_config
    ));
    out.push_str("------------------------------");
    out
}

fn ssh_prefix(target: &Target) -> String {
    match target.key_path() {
        Some(key) => format!("ssh -i {} {}", key.display(), target.address()),
        None => format!("ssh {}", target.address()),
    }
}
