//! `amount` commands
//!
//! Base units are printed as strings in JSON output so values above
//! 2^53 survive JavaScript consumers.

use deedreveal_core::amount::{
    check_decimals, format_amount, format_amount_display, parse_amount, sanitize_amount_input, validate_transfer,
};
use serde_json::json;

use crate::cli::args::{
    AmountCheckArgs, AmountFormatArgs, AmountParseArgs, AmountSanitizeArgs, OutputFormat,
};
use crate::config::AppConfig;
use crate::error::DeedRevealError;

/// `amount parse`: human input to base units.
///
/// # Errors
///
/// Returns [`DeedRevealError::Amount`] if the input is rejected.
pub fn parse(args: &AmountParseArgs, config: &AppConfig) -> Result<(), DeedRevealError> {
    let decimals = args.decimals.unwrap_or(config.token_decimals);
    let units = parse_amount(&args.input, decimals)?;

    match args.format {
        OutputFormat::Human => println!("{units}"),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "input": args.input,
                "decimals": decimals,
                "units": units.to_string(),
                "amount": format_amount(units, decimals),
            })
        ),
    }
    Ok(())
}

/// `amount format`: base units to a decimal string.
///
/// # Errors
///
/// Returns [`DeedRevealError::Amount`] if `decimals` exceeds the supported
/// maximum.
pub fn format(args: &AmountFormatArgs, config: &AppConfig) -> Result<(), DeedRevealError> {
    let decimals = args.decimals.unwrap_or(config.token_decimals);
    check_decimals(decimals)?;
    let text = match args.digits {
        Some(digits) => format_amount_display(args.units, decimals, usize::from(digits)),
        None => format_amount(args.units, decimals),
    };
    println!("{text}");
    Ok(())
}

/// `amount sanitize`: normalize raw form input.
pub fn sanitize(args: &AmountSanitizeArgs) {
    println!("{}", sanitize_amount_input(&args.input));
}

/// `amount check`: validate a transfer against a balance.
///
/// # Errors
///
/// Returns [`DeedRevealError::Amount`] if either amount does not parse,
/// the amount is zero, or it exceeds the balance.
pub fn check(args: &AmountCheckArgs, config: &AppConfig) -> Result<(), DeedRevealError> {
    let decimals = args.decimals.unwrap_or(config.token_decimals);
    let amount = parse_amount(&args.amount, decimals)?;
    let balance = parse_amount(&args.balance, decimals)?;

    validate_transfer(amount, balance)?;
    println!(
        "ok: {} of {}",
        format_amount(amount, decimals),
        format_amount(balance, decimals)
    );
    Ok(())
}
