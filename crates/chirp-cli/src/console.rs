use std::io::{self, BufRead, Write};

/// Line-oriented prompt/response over any reader and writer.
///
/// End of input plays the part of a cancelled dialog: `prompt` returns
/// `None` and callers back out of whatever they were doing. Bytes that are
/// not UTF-8 are replaced, so a garbled line is just a wrong answer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{text}")?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
