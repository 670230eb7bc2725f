//! Logical commands and per-cluster argv construction

use serde::Serialize;

use crate::error::{Error, Result};

/// Dry-run value kubectl treats as "not a dry run".
pub const DRY_RUN_NONE: &str = "none";

/// How a verb affects cluster state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbClass {
    /// `get`, `describe`, `top`
    ReadOnly,
    /// `apply`, `create`, `scale`, `patch`
    Mutating,
    /// `delete`; requires confirmation
    Destructive,
}

impl VerbClass {
    /// Whether a command of this class changes cluster state.
    pub fn mutates(self) -> bool {
        !matches!(self, VerbClass::ReadOnly)
    }

    pub fn needs_confirmation(self) -> bool {
        matches!(self, VerbClass::Destructive)
    }
}

/// What the command acts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// `-f <file>`
    File(String),
    /// `TYPE [NAME ...]` or `TYPE/NAME ...`
    Resources(Vec<String>),
}

impl Target {
    /// Resolve the target from positional args and `--filename`.
    ///
    /// The two forms are mutually exclusive. Empty positional strings are
    /// dropped so they never end up in argv.
    pub fn from_args(verb: &str, args: &[String], filename: Option<&str>) -> Result<Self> {
        let resources: Vec<String> = args.iter().filter(|a| !a.is_empty()).cloned().collect();
        let filename = filename.filter(|f| !f.is_empty());

        match (filename, resources.is_empty()) {
            (Some(_), false) => Err(Error::ConflictingTarget),
            (Some(file), true) => Ok(Target::File(file.to_string())),
            (None, false) => Ok(Target::Resources(resources)),
            (None, true) => Err(Error::MissingTarget {
                verb: verb.to_string(),
            }),
        }
    }
}

/// Flags appended to every per-cluster invocation when set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommonFlags {
    pub recursive: bool,
    /// `none`, `server` or `client`; `none` and empty are omitted
    pub dry_run: Option<String>,
    pub namespace: Option<String>,
    pub all_namespaces: bool,
}

/// One logical command, before it is fanned out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub verb: String,
    pub class: VerbClass,
    pub target: Target,
    pub flags: CommonFlags,
    /// Verb-specific flags such as `-l app=x` or `--replicas=3`
    pub verb_args: Vec<String>,
    /// Args after `--`, passed through untouched
    pub passthrough: Vec<String>,
}

impl CommandSpec {
    pub fn new(verb: impl Into<String>, class: VerbClass, target: Target) -> Self {
        Self {
            verb: verb.into(),
            class,
            target,
            flags: CommonFlags::default(),
            verb_args: Vec::new(),
            passthrough: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: CommonFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_verb_args(mut self, args: Vec<String>) -> Self {
        self.verb_args = args;
        self
    }

    pub fn with_passthrough(mut self, args: Vec<String>) -> Self {
        self.passthrough = args;
        self
    }

    /// Check flag combinations kubectl would reject anyway.
    pub fn validate(&self) -> Result<()> {
        if let Some(mode) = self.flags.dry_run.as_deref() {
            if !matches!(mode, "" | "none" | "server" | "client") {
                return Err(Error::validation(format!(
                    "invalid --dry-run value {:?}: must be \"none\", \"server\", or \"client\"",
                    mode
                )));
            }
        }
        Ok(())
    }

    /// Build the argv for one cluster context.
    pub fn argv_for(&self, context: &str) -> Vec<String> {
        let mut argv = vec![self.verb.clone()];

        match &self.target {
            Target::File(file) => {
                argv.push("-f".to_string());
                argv.push(file.clone());
            }
            Target::Resources(resources) => argv.extend(resources.iter().cloned()),
        }

        argv.push("--context".to_string());
        argv.push(context.to_string());

        if self.flags.recursive {
            argv.push("-R".to_string());
        }
        if let Some(mode) = self.flags.dry_run.as_deref() {
            if !mode.is_empty() && mode != DRY_RUN_NONE {
                argv.push(format!("--dry-run={}", mode));
            }
        }
        if let Some(ns) = self.flags.namespace.as_deref() {
            if !ns.is_empty() {
                argv.push("-n".to_string());
                argv.push(ns.to_string());
            }
        }
        if self.flags.all_namespaces {
            argv.push("--all-namespaces".to_string());
        }

        argv.extend(self.verb_args.iter().cloned());
        argv.extend(self.passthrough.iter().cloned());
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_target_conflict() {
        let err = Target::from_args("delete", &s(&["pod", "nginx"]), Some("x.yaml")).unwrap_err();
        assert!(matches!(err, Error::ConflictingTarget));
    }

    #[test]
    fn test_target_missing() {
        let err = Target::from_args("delete", &[], None).unwrap_err();
        assert!(matches!(err, Error::MissingTarget { .. }));
        // an empty --filename is treated as unset
        assert!(Target::from_args("delete", &[], Some("")).is_err());
    }

    #[test]
    fn test_target_drops_empty_names() {
        let t = Target::from_args("delete", &s(&["deployment", ""]), None).unwrap();
        assert_eq!(t, Target::Resources(s(&["deployment"])));
    }

    #[test]
    fn test_argv_resource_target() {
        let cmd = CommandSpec::new(
            "delete",
            VerbClass::Destructive,
            Target::Resources(s(&["deployment", "nginx"])),
        );
        assert_eq!(
            cmd.argv_for("wds1"),
            s(&["delete", "deployment", "nginx", "--context", "wds1"])
        );
    }

    #[test]
    fn test_argv_file_target_with_flags() {
        let cmd = CommandSpec::new(
            "delete",
            VerbClass::Destructive,
            Target::File("manifests/".into()),
        )
        .with_flags(CommonFlags {
            recursive: true,
            dry_run: Some("server".into()),
            namespace: Some("apps".into()),
            all_namespaces: false,
        });
        assert_eq!(
            cmd.argv_for("wds2"),
            s(&[
                "delete",
                "-f",
                "manifests/",
                "--context",
                "wds2",
                "-R",
                "--dry-run=server",
                "-n",
                "apps"
            ])
        );
    }

    #[test]
    fn test_argv_omits_default_flags() {
        let cmd = CommandSpec::new("get", VerbClass::ReadOnly, Target::Resources(s(&["pods"])))
            .with_flags(CommonFlags {
                recursive: false,
                dry_run: Some("none".into()),
                namespace: Some(String::new()),
                all_namespaces: false,
            });
        assert_eq!(cmd.argv_for("c"), s(&["get", "pods", "--context", "c"]));
    }

    #[test]
    fn test_argv_verb_args_then_passthrough() {
        let cmd = CommandSpec::new("get", VerbClass::ReadOnly, Target::Resources(s(&["pods"])))
            .with_flags(CommonFlags {
                all_namespaces: true,
                ..Default::default()
            })
            .with_verb_args(s(&["-l", "app=web"]))
            .with_passthrough(s(&["--show-labels"]));
        assert_eq!(
            cmd.argv_for("c"),
            s(&[
                "get",
                "pods",
                "--context",
                "c",
                "--all-namespaces",
                "-l",
                "app=web",
                "--show-labels"
            ])
        );
    }

    #[test]
    fn test_validate_rejects_bad_dry_run() {
        let cmd = CommandSpec::new("apply", VerbClass::Mutating, Target::File("a.yaml".into()))
            .with_flags(CommonFlags {
                dry_run: Some("maybe".into()),
                ..Default::default()
            });
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_verb_class() {
        assert!(!VerbClass::ReadOnly.mutates());
        assert!(VerbClass::Mutating.mutates());
        assert!(VerbClass::Destructive.needs_confirmation());
        assert!(!VerbClass::Mutating.needs_confirmation());
    }
}
