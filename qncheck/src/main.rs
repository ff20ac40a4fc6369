//! Normalize terms and decide equivalences modulo rewriting.

use clap::Parser;
use qncheck::{Error, Opt, Session};
use qnorm_parse::CmdIter;
use std::io::{self, Read};
use std::path::PathBuf;

/// Return stdin if no files given, else lazily open and return the files.
fn reads<'a>(files: &'a [PathBuf]) -> Box<dyn Iterator<Item = Result<Box<dyn Read>, Error>> + 'a> {
    if files.is_empty() {
        let read: Box<dyn Read> = Box::new(io::stdin());
        Box::new(std::iter::once(Ok(read)))
    } else {
        Box::new(files.iter().map(|file| {
            let read: Box<dyn Read> = if file.as_os_str() == "-" {
                Box::new(io::stdin())
            } else {
                Box::new(std::fs::File::open(file)?)
            };
            Ok(read)
        }))
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = Opt::parse();
    let mut session = Session::new(&opt);

    for read in reads(&opt.files) {
        let mut contents = String::new();
        read?.read_to_string(&mut contents)?;

        for cmd in CmdIter::new(&contents) {
            let cmd = cmd?;
            if opt.echo {
                println!("{}", cmd)
            }
            if let Some(output) = session.handle(cmd)? {
                println!("{}", output)
            }
        }
    }

    if opt.export {
        print!("{}", session.rules().trs())
    }
    Ok(())
}
