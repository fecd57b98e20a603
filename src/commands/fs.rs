//! Working-directory commands.

use std::env;
use std::fs;

use crate::shell::{BoundArgs, Command, HandlerError, ParamType, Parameter};
use crate::value::Value;

fn current_dir() -> Result<Value, HandlerError> {
    let cwd = env::current_dir()?;
    Ok(Value::Path(cwd.to_string_lossy().into_owned()))
}

/// Change the working directory; with no argument, report it.
pub fn cd() -> Command {
    Command::new("cd")
        .help("Changes the working directory and returns it")
        .signature(
            vec![Parameter::optional("path", ParamType::Path, Value::None)],
            |_, args: &BoundArgs| {
                if let Value::Path(path) = args.value("path") {
                    env::set_current_dir(&path)?;
                }
                current_dir()
            },
        )
}

/// Create a directory (and its parents) and return its path.
pub fn mkdir() -> Command {
    Command::new("mkdir")
        .help("Creates a directory, parents included")
        .signature(
            vec![Parameter::required("path", ParamType::Path)],
            |_, args: &BoundArgs| {
                let Value::Path(path) = args.value("path") else {
                    return Err(HandlerError::new("expected a path"));
                };
                fs::create_dir_all(&path)?;
                Ok(Value::Path(path))
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::default_shell;
    use crate::interpreter::Interpreter;

    #[test]
    fn test_cd_without_argument_reports_cwd() {
        let mut interp = Interpreter::new(default_shell());
        match interp.eval("cd").unwrap() {
            Value::Path(path) => assert!(!path.is_empty()),
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[test]
    fn test_mkdir_creates_and_returns_path() {
        let mut interp = Interpreter::new(default_shell());
        let dir = env::temp_dir().join("shellsy-mkdir-test/nested");
        let line = format!("mkdir /{}/", dir.display());
        match interp.eval(&line).unwrap() {
            Value::Path(path) => {
                assert!(fs::metadata(&path).unwrap().is_dir());
            }
            other => panic!("expected a path, got {:?}", other),
        }
        let _ = fs::remove_dir_all(env::temp_dir().join("shellsy-mkdir-test"));
    }

    #[test]
    fn test_mkdir_requires_path_type() {
        let mut interp = Interpreter::new(default_shell());
        assert!(interp.eval("mkdir 5").is_err());
    }
}
