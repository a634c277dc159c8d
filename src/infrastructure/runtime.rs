//! External runtime command line composition.
//!
//! Layout of the launched command:
//!
//! ```text
//! <java> <java_opts..> [<attach_opts..>] [-D<k=v>..] -cp <classpath> <class> <parameters..> <argv..>
//! ```
//!
//! A descriptor without a class runs `<java>` as a plain executable with
//! `<parameters..> <argv..>` only.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::Settings;
use crate::domain::{ArgumentVector, InvocationRequest};
use crate::infrastructure::traits::LaunchRequest;

const CLASSPATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Resolved runtime settings shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeTarget {
    pub program: PathBuf,
    pub java_opts: Vec<String>,
    pub attach_opts: Vec<String>,
    pub classpath: String,
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl RuntimeTarget {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: PathBuf::from(&settings.runtime.java),
            java_opts: settings.runtime.java_opts.clone(),
            attach_opts: settings.runtime.attach_opts.clone(),
            classpath: settings.classpath().join(CLASSPATH_SEPARATOR),
            env: settings.env.clone(),
            working_dir: settings.working_dir.clone(),
        }
    }

    /// Arguments passed to the runtime program, the argument vector last.
    pub fn command_line(&self, request: &InvocationRequest<'_>, argv: &ArgumentVector) -> Vec<String> {
        let descriptor = request.descriptor();
        let mut args = Vec::new();

        if !descriptor.class_name.is_empty() {
            args.extend(self.java_opts.iter().cloned());
            if request.runtime().attach_debug {
                args.extend(self.attach_opts.iter().cloned());
            }
            args.extend(
                request
                    .runtime()
                    .properties
                    .iter()
                    .map(|p| format!("-D{p}")),
            );
            if !self.classpath.is_empty() {
                args.push("-cp".to_string());
                args.push(self.classpath.clone());
            }
            args.push(descriptor.class_name.clone());
        }
        args.extend(descriptor.parameters.iter().cloned());
        args.extend(argv.iter().cloned());
        args
    }

    pub fn launch_request(&self, request: &InvocationRequest<'_>, argv: &ArgumentVector) -> LaunchRequest {
        LaunchRequest {
            program: self.program.clone(),
            args: self.command_line(request, argv),
            env: self.env.clone(),
            working_dir: self.working_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{Arity, CommandDescriptor, FlagSpec, FlagValue, RuntimeOptions};

    fn target() -> RuntimeTarget {
        RuntimeTarget {
            program: PathBuf::from("/usr/bin/java"),
            java_opts: vec!["-Xmx1g".into()],
            attach_opts: vec!["-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=60000".into()],
            classpath: "/opt/fs/conf:/opt/fs/lib/*".into(),
            env: BTreeMap::new(),
            working_dir: None,
        }
    }

    fn chgrp() -> CommandDescriptor {
        CommandDescriptor::new("chgrp", "<group> <path>", Arity::Exact(2))
            .flag(FlagSpec::switch("recursive", "-R").short('R'))
            .target("fs.Shell", ["chgrp"])
    }

    #[test]
    fn given_class_descriptor_when_composing_then_argv_follows_class_and_parameters() {
        let descriptor = chgrp();
        let mut flags = BTreeMap::new();
        flags.insert("recursive".to_string(), FlagValue::Switch(true));
        let request = InvocationRequest::new(
            &descriptor,
            flags,
            vec!["developers".into(), "/data".into()],
            RuntimeOptions::default(),
        )
        .unwrap();
        let argv = request.argument_vector().unwrap();

        let line = target().command_line(&request, &argv);

        assert_eq!(
            line,
            vec![
                "-Xmx1g",
                "-cp",
                "/opt/fs/conf:/opt/fs/lib/*",
                "fs.Shell",
                "chgrp",
                "-R",
                "developers",
                "/data"
            ]
        );
    }

    #[test]
    fn given_runtime_options_when_composing_then_placed_before_classpath() {
        let descriptor = chgrp();
        let request = InvocationRequest::new(
            &descriptor,
            BTreeMap::new(),
            vec!["g".into(), "/p".into()],
            RuntimeOptions {
                attach_debug: true,
                properties: vec!["user=admin".into()],
            },
        )
        .unwrap();
        let argv = request.argument_vector().unwrap();

        let line = target().command_line(&request, &argv);

        assert_eq!(line[0], "-Xmx1g");
        assert!(line[1].starts_with("-agentlib:jdwp"));
        assert_eq!(line[2], "-Duser=admin");
        assert_eq!(line[3], "-cp");
        assert_eq!(&line[line.len() - 2..], ["g", "/p"]);
    }

    #[test]
    fn given_descriptor_without_class_when_composing_then_plain_executable() {
        let descriptor = CommandDescriptor::new("echo", "<word>", Arity::Exact(1));
        let request = InvocationRequest::new(
            &descriptor,
            BTreeMap::new(),
            vec!["hi".into()],
            RuntimeOptions::default(),
        )
        .unwrap();
        let argv = request.argument_vector().unwrap();

        let launch = target().launch_request(&request, &argv);

        assert_eq!(launch.program, PathBuf::from("/usr/bin/java"));
        assert_eq!(launch.args, vec!["hi"]);
    }
}
