use clap::Parser;
use qnorm::Strategy;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
/// Normalize terms and decide equivalences modulo rewriting
pub struct Opt {
    /// Order in which subterms are rewritten
    ///
    /// Possible values are: outermost, innermost.
    /// Both strategies reach the same normal form for
    /// terminating and confluent rule sets.
    #[arg(long, default_value_t = Strategy::OuterMost)]
    pub strategy: Strategy,

    /// Perform at most the given number of rewrite steps per term
    ///
    /// If the limit is reached before a normal form,
    /// the last reached term is printed with the note "(truncated)".
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print every rewrite step of normalizations
    #[arg(long)]
    pub trace: bool,

    /// Print all rules after processing all files
    ///
    /// The rules are printed in a line-oriented notation `lhs -> rhs ;`,
    /// which can be given to external confluence and termination checkers.
    #[arg(long)]
    pub export: bool,

    /// Print commands before processing them
    #[arg(long)]
    pub echo: bool,

    /// Files to process (cumulative)
    ///
    /// Processing multiple files is equivalent to processing their concatenation.
    /// To read from standard input, use "-" as file name
    /// or do not give any file.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}
