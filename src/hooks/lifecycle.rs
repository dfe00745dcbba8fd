use serde::{Deserialize, Serialize};

use crate::domain::Version;

/// Points in the release where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookStage {
    /// End of the prepare phase, after files are bumped
    Before,
    /// After the release commit and tag exist
    After,
}

impl HookStage {
    /// Get the stage name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookStage::Before => "before",
            HookStage::After => "after",
        }
    }
}

/// An external command configured to run around the release
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookCommand {
    /// Program to execute
    pub name: String,

    /// Arguments; `{version}` is replaced with the release version
    #[serde(default)]
    pub args: Vec<String>,

    /// Flag passed before the version, e.g. `--new-version`
    #[serde(default)]
    pub version_flag: Option<String>,

    /// Also run when dry-run mode is active
    #[serde(default)]
    pub run_in_dry_run: bool,

    /// A failure aborts the remaining pipeline
    #[serde(default)]
    pub break_on_error: bool,
}

impl HookCommand {
    pub fn new(name: impl Into<String>) -> Self {
        HookCommand {
            name: name.into(),
            args: Vec::new(),
            version_flag: None,
            run_in_dry_run: false,
            break_on_error: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version_flag(mut self, flag: impl Into<String>) -> Self {
        self.version_flag = Some(flag.into());
        self
    }

    pub fn breaking(mut self) -> Self {
        self.break_on_error = true;
        self
    }

    pub fn in_dry_run(mut self) -> Self {
        self.run_in_dry_run = true;
        self
    }

    /// Arguments with the version substituted in
    pub fn resolved_args(&self, version: &Version) -> Vec<String> {
        let formatted = version.format_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{version}", &formatted))
            .collect();

        if let Some(flag) = &self.version_flag {
            args.push(flag.clone());
            args.push(formatted);
        }

        args
    }

    /// Command line as shown to the user
    pub fn display(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
