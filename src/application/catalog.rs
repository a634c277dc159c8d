//! The `fs` operation family.
//!
//! Every operation is hosted by the same shell class and receives its own
//! name as the leading parameter.

use crate::application::registry::CommandRegistry;
use crate::domain::{Arity, CommandDescriptor, DomainResult, FlagSpec};

/// Default runtime class hosting the filesystem shell.
pub const FILE_SYSTEM_SHELL_CLASS: &str = "alluxio.cli.fs.FileSystemShell";

/// Build a registry holding every `fs` operation, targeting `class_name`.
pub fn fs_registry(class_name: &str) -> DomainResult<CommandRegistry> {
    let mut registry = CommandRegistry::new();
    for descriptor in fs_commands(class_name) {
        registry.register(descriptor)?;
    }
    Ok(registry)
}

pub fn fs_commands(class_name: &str) -> Vec<CommandDescriptor> {
    let op = |name: &str, usage: &str, arity: Arity, about: &str| {
        CommandDescriptor::new(name, usage, arity)
            .about(about)
            .target(class_name, [name])
    };

    vec![
        op("cat", "<path>", Arity::Exact(1), "Prints the content of a file to the console"),
        op("checksum", "<path>", Arity::Exact(1), "Calculates the md5 checksum of a file"),
        op(
            "chgrp",
            "<group> <path>",
            Arity::Exact(2),
            "Changes the group of a file or directory",
        )
        .flag(recursive("change the group recursively")),
        op(
            "chmod",
            "<mode> <path>",
            Arity::Exact(2),
            "Changes the permission of a file or directory",
        )
        .flag(recursive("change the permission recursively")),
        op(
            "chown",
            "<owner>[:<group>] <path>",
            Arity::Exact(2),
            "Changes the owner of a file or directory",
        )
        .flag(recursive("change the owner recursively")),
        op(
            "count",
            "<path>",
            Arity::Exact(1),
            "Displays the number of files and folders under a path",
        )
        .flag(FlagSpec::switch("size", "--size").help("also report the total size")),
        op("cp", "<src> <dst>", Arity::Exact(2), "Copies a file or directory")
            .flag(recursive("copy directories recursively"))
            .flag(
                FlagSpec::separate("thread", "THREADS", "--thread")
                    .help("number of threads used to copy files"),
            )
            .flag(
                FlagSpec::separate("buffer-size", "BYTES", "--buffer-size")
                    .help("read buffer size in bytes"),
            )
            .flag(
                FlagSpec::switch("preserve", "--preserve")
                    .short('p')
                    .help("preserve owner, group and mode"),
            ),
        op(
            "du",
            "<path>",
            Arity::Exact(1),
            "Prints the size of files and directories under a path",
        )
        .flag(
            FlagSpec::switch("summarize", "-s")
                .short('s')
                .help("display the aggregate summary"),
        )
        .flag(FlagSpec::switch("human-readable", "-h").help("print sizes in human readable format"))
        .flag(FlagSpec::switch("memory", "--memory").help("display in-memory size and percentage")),
        op("head", "<path>", Arity::Exact(1), "Prints the leading bytes of a file")
            .flag(
                FlagSpec::separate("bytes", "BYTES", "-c")
                    .short('c')
                    .help("number of bytes to print"),
            ),
        op(
            "ls",
            "<path>",
            Arity::Exact(1),
            "Lists files and directories at a path",
        )
        .flag(recursive("list subdirectories recursively"))
        .flag(
            FlagSpec::switch("force", "-f")
                .short('f')
                .help("force loading metadata of immediate children"),
        )
        .flag(FlagSpec::switch("human-readable", "-h").help("print sizes in human readable format"))
        .flag(
            FlagSpec::switch("pinned", "-p")
                .short('p')
                .help("only list pinned files"),
        )
        .flag(
            FlagSpec::separate("sort", "FIELD", "--sort")
                .help("sort by creationTime, inMemoryPercentage, lastAccessTime, lastModificationTime, name, path or size"),
        )
        .flag(
            FlagSpec::switch("reverse", "-r")
                .short('r')
                .help("reverse the sort order"),
        ),
        op(
            "mkdir",
            "<path> [<path>...]",
            Arity::at_least(1),
            "Creates directories, including missing parents",
        ),
        op("mv", "<src> <dst>", Arity::Exact(2), "Renames a file or directory"),
        op("rm", "<path>", Arity::Exact(1), "Removes a file or directory")
            .flag(recursive("remove directories recursively"))
            .flag(
                FlagSpec::switch("skip-ufs-check", "-U")
                    .short('U')
                    .help("skip the under-storage consistency check"),
            ),
        op(
            "stat",
            "<path>",
            Arity::Exact(1),
            "Displays metadata of a file or directory",
        )
        .flag(
            FlagSpec::separate("format", "FORMAT", "-f")
                .short('f')
                .help("output format, e.g. '%N %z'"),
        ),
        op("tail", "<path>", Arity::Exact(1), "Prints the trailing bytes of a file")
            .flag(
                FlagSpec::separate("bytes", "BYTES", "-c")
                    .short('c')
                    .help("number of bytes to print"),
            ),
        op(
            "test",
            "<path>",
            Arity::Exact(1),
            "Tests a property of a path, exiting 0 when it holds and 1 otherwise",
        )
        .flag(FlagSpec::switch("dir", "-d").short('d').help("path is a directory"))
        .flag(FlagSpec::switch("exists", "-e").short('e').help("path exists"))
        .flag(FlagSpec::switch("file", "-f").short('f').help("path is a file"))
        .flag(FlagSpec::switch("not-empty", "-s").short('s').help("directory is not empty"))
        .flag(FlagSpec::switch("zero", "-z").short('z').help("file has zero length")),
        op(
            "touch",
            "<path>",
            Arity::Exact(1),
            "Creates a zero-length file",
        ),
    ]
}

fn recursive(help: &str) -> FlagSpec {
    FlagSpec::switch("recursive", "-R").short('R').help(help)
}
