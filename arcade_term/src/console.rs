use std::io::{self, BufRead, Write};

/// Line based terminal I/O. Owns both halves so a game can take the whole
/// console onto another thread and hand it back.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Reads one line without its line ending. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prints `prompt` without a newline and reads the reply.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say<S: AsRef<str>>(&mut self, message: S) -> io::Result<()> {
        writeln!(self.output, "{}", message.as_ref())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use test_log::test;

    use super::*;

    #[test]
    fn reads_lines_until_eof() {
        let mut console = Console::new(Cursor::new("first\r\nsecond\n"), Vec::new());
        assert_eq!(Some("first".to_string()), console.read_line().unwrap());
        assert_eq!(
            Some("second".to_string()),
            console.ask("Next? ").unwrap()
        );
        assert_eq!(None, console.read_line().unwrap());
        console.say("bye!").unwrap();
        let (_, output) = console.into_parts();
        assert_eq!("Next? bye!\n", String::from_utf8(output).unwrap());
    }
}
