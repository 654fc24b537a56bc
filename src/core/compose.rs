//! docker compose 调用构造

use crate::types::ServerPaths;
use crate::utils::executor::Invocation;
use std::path::PathBuf;

/// 固定项目目录、compose 文件与 env 文件的 compose 调用构造器
#[derive(Debug, Clone)]
pub struct ComposeCommand {
    project_dir: PathBuf,
    compose_file: PathBuf,
    env_file: PathBuf,
}

impl ComposeCommand {
    pub fn new(project_dir: PathBuf, compose_file: PathBuf, env_file: PathBuf) -> Self {
        Self {
            project_dir,
            compose_file,
            env_file,
        }
    }

    pub fn from_paths(paths: &ServerPaths) -> Self {
        Self::new(
            paths.root.clone(),
            paths.compose_file.clone(),
            paths.env_file.clone(),
        )
    }

    /// `docker compose --project-directory <dir> -f <file> --env-file <env> <sub...> <extra...>`
    pub fn build(&self, sub: &[&str], extra: &[String]) -> Invocation {
        let mut args = vec![
            "compose".to_string(),
            "--project-directory".to_string(),
            self.project_dir.display().to_string(),
            "-f".to_string(),
            self.compose_file.display().to_string(),
            "--env-file".to_string(),
            self.env_file.display().to_string(),
        ];
        args.extend(sub.iter().map(|s| s.to_string()));
        args.extend(extra.iter().cloned());
        Invocation::new("docker", args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prefix_then_sub_then_extra() {
        let compose = ComposeCommand::from_paths(&ServerPaths::from_root("/srv/stack"));
        let inv = compose.build(
            &["build", "--no-cache", "--pull"],
            &["php83".to_string(), "nginx".to_string()],
        );

        assert_eq!(inv.program, "docker");
        assert_eq!(
            inv.args,
            vec![
                "compose",
                "--project-directory",
                "/srv/stack",
                "-f",
                "/srv/stack/docker/compose/main.yaml",
                "--env-file",
                "/srv/stack/docker/.env",
                "build",
                "--no-cache",
                "--pull",
                "php83",
                "nginx",
            ]
        );
    }

    #[test]
    fn test_build_without_extra() {
        let compose = ComposeCommand::new(
            PathBuf::from("/p"),
            PathBuf::from("/p/c.yaml"),
            PathBuf::from("/p/.env"),
        );
        let inv = compose.build(&["up", "-d"], &[]);
        assert_eq!(&inv.args[7..], ["up", "-d"]);
    }
}
