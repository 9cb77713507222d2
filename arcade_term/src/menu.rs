use std::io::{self, BufRead, Write};

use indoc::indoc;

use crate::console::Console;

pub const MENU: &str = indoc! {"

    === Menu ===
    Press W to play the Word game.
    Press N to play the Number game.
    Press M to play the ASL Learning Ladder game.
    Press Q to quit."};

pub const QUIT_MESSAGE: &str = "bye!";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuChoice {
    Word,
    Number,
    Ladder,
    Quit,
}

impl MenuChoice {
    /// Single letter choices, any case. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "w" => Some(MenuChoice::Word),
            "n" => Some(MenuChoice::Number),
            "m" => Some(MenuChoice::Ladder),
            "q" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// Shows the menu until a valid choice is entered. End of input quits.
pub fn prompt_choice<R: BufRead, W: Write>(console: &mut Console<R, W>) -> io::Result<MenuChoice> {
    loop {
        console.say(MENU)?;
        let Some(line) = console.read_line()? else {
            return Ok(MenuChoice::Quit);
        };
        match MenuChoice::parse(&line) {
            Some(choice) => return Ok(choice),
            None => {
                log::debug!("Invalid menu input [{line}]");
                console.say(format!("Invalid choice [{}], please try again.", line.trim()))?;
            },
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use test_log::test;

    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Some(MenuChoice::Word), MenuChoice::parse("W"));
        assert_eq!(Some(MenuChoice::Number), MenuChoice::parse("n"));
        assert_eq!(Some(MenuChoice::Ladder), MenuChoice::parse(" M "));
        assert_eq!(Some(MenuChoice::Quit), MenuChoice::parse("q"));
        assert_eq!(None, MenuChoice::parse("x"));
        assert_eq!(None, MenuChoice::parse("nn"));
        assert_eq!(None, MenuChoice::parse(""));
    }

    #[test]
    fn invalid_input_reprompts() {
        let mut console = Console::new(Cursor::new("z\nN\n"), Vec::new());
        assert_eq!(MenuChoice::Number, prompt_choice(&mut console).unwrap());
        let (_, output) = console.into_parts();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(2, output.matches("=== Menu ===").count());
        assert!(output.contains("Invalid choice [z]"));
    }

    #[test]
    fn end_of_input_quits() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        assert_eq!(MenuChoice::Quit, prompt_choice(&mut console).unwrap());
    }
}
