//! date command implementation

use crate::calendar::CalendarConverter;
use crate::cli::args::DateArgs;
use crate::config::ProcessorConfig;
use anyhow::{Context, Result};
use chrono::Utc;

pub fn run_date(args: DateArgs, config: &ProcessorConfig) -> Result<String> {
    let converter = CalendarConverter::default();

    let rendered = if args.now {
        converter.convert_instant(Utc::now(), config.utc_offset_hours)?
    } else {
        let token = args.joined_token();
        converter
            .convert(&token, config.utc_offset_hours)
            .with_context(|| format!("Cannot render '{}'", token))?
    };

    let text = rendered.to_string();
    println!("{}", text);
    Ok(text)
}
