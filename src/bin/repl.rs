use dice_notation::{Error, MarkdownStringifier};
use std::io::{self, BufRead, Write};

fn roll_line(line: &str) -> Result<String, Error> {
    let expr = dice_notation::parse(line, true)?;
    let roll = dice_notation::roll::eval(line, &expr, rand::thread_rng())?;
    Ok(roll.render::<MarkdownStringifier>()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match roll_line(line.trim()) {
                Ok(rendered) => println!("{}", rendered),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
