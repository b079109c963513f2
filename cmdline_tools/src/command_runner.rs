use std::process::Stdio;

use cmdline_core::{Command, Platform};

/// Translate a [`Command`] into a tokio process ready to be spawned.
///
/// The child sees exactly the command's environment map, not the parent's.
#[must_use]
pub fn build_command(command: &Command, platform: Platform) -> tokio::process::Command {
    let invocation = command.to_invocation_for(platform);
    let (program, args) = invocation
        .split_first()
        .map_or((command.executable(), &[][..]), |(p, rest)| (p.as_str(), rest));

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .env_clear()
        .envs(command.environment_variables())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = command.directory() {
        cmd.current_dir(dir);
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_and_args(cmd: &tokio::process::Command) -> (String, Vec<String>) {
        let std_cmd = cmd.as_std();
        (
            std_cmd.get_program().to_string_lossy().into_owned(),
            std_cmd
                .get_args()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        )
    }

    #[test]
    fn test_build_command_direct() {
        let mut spec = Command::with_environment("echo", [("A", "1")]).unwrap();
        spec.add_argument("hello").set_directory("/tmp");

        let cmd = build_command(&spec, Platform::Unix);
        let (program, args) = program_and_args(&cmd);
        assert_eq!(program, "echo");
        assert_eq!(args, ["hello"]);
        assert_eq!(
            cmd.as_std().get_current_dir(),
            Some(std::path::Path::new("/tmp"))
        );
    }

    #[test]
    fn test_build_command_shell_prefix() {
        let mut spec = Command::with_environment("script.bat", Vec::<(String, String)>::new())
            .unwrap();
        spec.add_argument("x").set_new_shell(true);

        let (program, args) = program_and_args(&build_command(&spec, Platform::Windows));
        assert_eq!(program, "cmd");
        assert_eq!(args, ["/C", "script.bat", "x"]);

        let (program, args) = program_and_args(&build_command(&spec, Platform::Unix));
        assert_eq!(program, "sh");
        assert_eq!(args, ["script.bat", "x"]);
    }

    #[test]
    fn test_build_command_environment() {
        let mut spec = Command::with_environment("env", [("KEEP", "yes")]).unwrap();
        spec.set_environment_variable("EXTRA", "1");

        let cmd = build_command(&spec, Platform::Unix);
        let envs: Vec<(String, Option<String>)> = cmd
            .as_std()
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.map(|v| v.to_string_lossy().into_owned()),
                )
            })
            .collect();
        assert!(envs.contains(&("KEEP".to_string(), Some("yes".to_string()))));
        assert!(envs.contains(&("EXTRA".to_string(), Some("1".to_string()))));
        assert!(cmd.as_std().get_current_dir().is_none());
    }
}
