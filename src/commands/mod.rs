//! Builtin command set.

pub mod control;
pub mod fs;
pub mod general;
pub mod words;

use crate::shell::Shell;

/// The default command tree of the shipped shell.
pub fn default_shell() -> Shell {
    let mut shell = Shell::new("shellsy");
    shell.add_command(general::echo());
    shell.add_command(general::print());
    shell.add_command(general::var());
    shell.add_command(general::eval());
    shell.add_command(control::if_cmd());
    shell.add_command(control::while_cmd());
    shell.add_command(fs::cd());
    shell.add_command(fs::mkdir());
    shell.add_command(general::help());
    shell.add_command(general::exit());
    shell.add_child(words::word_shell());
    shell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_completions() {
        let shell = default_shell();
        let paths = shell.completions();
        assert!(paths.contains(&"echo".to_string()));
        assert!(paths.contains(&"if".to_string()));
        assert!(paths.contains(&"word.add".to_string()));
        assert!(paths.contains(&"word.list".to_string()));
        // Registration order is preserved.
        let echo = paths.iter().position(|p| p == "echo").unwrap();
        let exit = paths.iter().position(|p| p == "exit").unwrap();
        assert!(echo < exit);
    }
}
