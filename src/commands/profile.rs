//! profile 命令与 mkhost 同步

use super::CommandContext;
use crate::core::ProfileSet;
use crate::core::profiles;
use crate::error::{Result, ServerError};
use crate::types::ProfileAction;
use crate::utils::executor::Invocation;
use crate::utils::paths::file_exists;

pub fn modify(ctx: &CommandContext, action: ProfileAction, names: &[String]) -> Result<i32> {
    let store = ctx.store();
    let set = ProfileSet::new(&store).modify(action, names)?;
    if ctx.verbose {
        println!("✓ COMPOSE_PROFILES={}", profiles::serialize(&set));
    }
    Ok(0)
}

pub fn list(ctx: &CommandContext) -> Result<i32> {
    let store = ctx.store();
    for name in ProfileSet::new(&store).current()? {
        println!("{}", name);
    }
    Ok(0)
}

/// 在工具容器中运行 mkhost，并把它选中的 PHP/Apache profile 加入激活集合
pub fn setup_domain(ctx: &CommandContext) -> Result<i32> {
    let tools = ctx.paths.tools_container.as_str();
    let mkhost = |flag: &str| ctx.docker(["exec", tools, "mkhost", flag]);

    ctx.runner.run(&mkhost("--RESET"))?;
    ctx.runner
        .run(&ctx.docker(["exec", "-it", tools, "mkhost"]))?;

    let mut selected = Vec::new();
    for flag in ["--ACTIVE_PHP_PROFILE", "--APACHE_ACTIVE"] {
        match ctx.runner.capture(&mkhost(flag)) {
            Ok(profile) if !profile.trim().is_empty() => selected.push(profile.trim().to_string()),
            Ok(_) => {}
            Err(e) => tracing::warn!(flag, error = %e, "mkhost 查询失败，跳过"),
        }
    }

    if !selected.is_empty() {
        let store = ctx.store();
        ProfileSet::new(&store).modify(ProfileAction::Add, &selected)?;
    }

    ctx.runner.run(&mkhost("--RESET"))?;
    Ok(0)
}

/// 运行 docker/utilities/profiles
pub fn setup_profiles(ctx: &CommandContext) -> Result<i32> {
    let script = ctx.paths.utilities_dir.join("profiles");
    if !file_exists(&script) {
        return Err(ServerError::NotFound(format!(
            "utilities/profiles 不存在: {}",
            script.display()
        )));
    }
    ctx.runner.run(&Invocation::new(
        script.display().to_string(),
        Vec::<String>::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Action;
    use crate::test_utils::ServerFixture;

    #[test]
    fn test_add_and_remove_through_dispatcher() {
        let fx = ServerFixture::new();
        fx.dispatch(Action::Profiles {
            action: ProfileAction::Add,
            names: vec!["php83".into(), "apache".into()],
        })
        .unwrap();
        fx.dispatch(Action::Profiles {
            action: ProfileAction::Remove,
            names: vec!["apache".into()],
        })
        .unwrap();

        assert_eq!(fx.read_env(), "COMPOSE_PROFILES=php83\n");
        assert_eq!(fx.dispatch(Action::ProfileList).unwrap(), 0);
    }

    #[test]
    fn test_setup_domain_adds_selected_profiles() {
        let fx = ServerFixture::new();
        fx.write_env("TZ=UTC\nCOMPOSE_PROFILES=mariadb\n");
        fx.runner.output("--ACTIVE_PHP_PROFILE", "php82\n");
        fx.runner.output("--APACHE_ACTIVE", "apache");

        assert_eq!(fx.dispatch(Action::SetupDomain).unwrap(), 0);

        assert_eq!(fx.read_env(), "TZ=UTC\nCOMPOSE_PROFILES=apache,mariadb,php82\n");
        let calls = fx.runner.calls();
        assert_eq!(calls.first().unwrap().args, ["exec", "SERVER_TOOLS", "mkhost", "--RESET"]);
        assert_eq!(calls[1].args, ["exec", "-it", "SERVER_TOOLS", "mkhost"]);
        assert_eq!(calls.last().unwrap().args, ["exec", "SERVER_TOOLS", "mkhost", "--RESET"]);
    }

    #[test]
    fn test_setup_domain_skips_empty_answers() {
        let fx = ServerFixture::new();
        fx.runner.output("--ACTIVE_PHP_PROFILE", "");

        fx.dispatch(Action::SetupDomain).unwrap();

        assert!(!fx.paths.env_file.exists());
    }

    #[test]
    fn test_setup_profiles_requires_script() {
        let fx = ServerFixture::new();
        let err = fx.dispatch(Action::SetupProfiles).unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));

        fx.write_file("docker/utilities/profiles", "#!/bin/sh\n");
        assert_eq!(fx.dispatch(Action::SetupProfiles).unwrap(), 0);
        assert!(fx.runner.calls()[0].program.ends_with("profiles"));
    }
}
