use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Line(String),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            rl: DefaultEditor::new()?,
        })
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                Ok(ReadOutput::Clear)
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                Ok(ReadOutput::Exit)
            }
            Err(err) => Err(err),
            Ok(line) => {
                self.rl.add_history_entry(line.as_str())?;
                Ok(ReadOutput::Line(line))
            }
        }
    }
}
