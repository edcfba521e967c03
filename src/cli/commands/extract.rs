use anyhow::Result;

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::super::report::{print_extracted, print_parse_warning, report};
use crate::{
    core::context::{ExtractContext, FileFailure},
    issues::Issue,
};

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let ctx = ExtractContext::new(&cmd.common)?;
    let outcomes = ctx.run()?;

    let issues: Vec<Issue> = outcomes.iter().flat_map(|o| o.issues()).collect();
    let failed_files = outcomes.iter().filter(|o| o.is_failure()).count();
    let parse_errors = outcomes
        .iter()
        .filter(|o| matches!(o.result, Err(FileFailure::Parse(_))))
        .count();

    report(&issues);

    if failed_files == 0 {
        let messages = outcomes.iter().map(|o| o.message_count()).sum();
        print_extracted(messages, outcomes.len());
    }
    print_parse_warning(parse_errors, ctx.verbose);

    Ok(ExitStatus::from_failures(failed_files))
}
