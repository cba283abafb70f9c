use serde_json::json;
use typebridge_core::{
    adjust_decimal, flattening_strategy, ConversionResult, SourceType, TypeConverter,
};

use super::Report;

pub(crate) fn cmd_adjust_decimal(precision: u8, scale: u8) -> Report {
    let adjustment = adjust_decimal(precision, scale);
    let mut text = format!(
        "DECIMAL({},{}) -> DECIMAL({},{})",
        precision, scale, adjustment.adjusted_precision, adjustment.adjusted_scale
    );
    if let Some(warning) = &adjustment.warning {
        text.push_str(&format!("\nwarning: {}", warning));
    }
    Report {
        json: json!({
            "precision": precision,
            "scale": scale,
            "adjustment": adjustment,
        }),
        text,
    }
}

pub(crate) fn cmd_info(conv: &TypeConverter, source: &str) -> ConversionResult<Report> {
    let source: SourceType = source.parse()?;
    let info = conv.mapping_info(&source)?;
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let text = format!(
        "source:           {}\ninterchange:      {}\ntarget:           {}\nprecision loss:   {}\nspecial handling: {}\nnotes:            {}",
        info.source_type_name,
        info.interchange_type_name.as_deref().unwrap_or("(none)"),
        info.target_type_name,
        yes_no(info.has_precision_loss),
        yes_no(info.requires_special_handling),
        info.notes,
    );
    Ok(Report {
        json: json!(info),
        text,
    })
}

pub(crate) fn cmd_check(conv: &TypeConverter, from: &str, to: &str) -> ConversionResult<Report> {
    let (from, to) = parse_pair(from, to)?;
    let message = conv.check_compatibility(&from, &to)?;
    Ok(pair_report(&from, &to, message))
}

pub(crate) fn cmd_validate_range(
    conv: &TypeConverter,
    from: &str,
    to: &str,
) -> ConversionResult<Report> {
    let (from, to) = parse_pair(from, to)?;
    let message = conv.validate_numeric_range(&from, &to)?;
    Ok(pair_report(&from, &to, message))
}

pub(crate) fn cmd_flatten(source: &str) -> ConversionResult<Report> {
    let source: SourceType = source.parse()?;
    let strategy = flattening_strategy(&source)?;
    Ok(Report {
        json: json!({ "source": source.to_string(), "strategy": strategy }),
        text: strategy,
    })
}

fn parse_pair(from: &str, to: &str) -> ConversionResult<(SourceType, SourceType)> {
    Ok((from.parse()?, to.parse()?))
}

fn pair_report(from: &SourceType, to: &SourceType, message: String) -> Report {
    Report {
        json: json!({
            "from": from.to_string(),
            "to": to.to_string(),
            "compatible": true,
            "message": message,
        }),
        text: message,
    }
}
