use serde_json::json;
use typebridge_core::{ConversionResult, SourceType, TypeConverter};

use super::Report;

pub(crate) fn cmd_to_target(conv: &TypeConverter, source: &str) -> ConversionResult<Report> {
    let source: SourceType = source.parse()?;
    let target = conv.to_target(&source)?;
    Ok(Report {
        json: json!({ "source": source.to_string(), "target": target }),
        text: target,
    })
}

pub(crate) fn cmd_to_source(conv: &TypeConverter, target: &str) -> ConversionResult<Report> {
    let source = conv.target_to_source(target)?;
    Ok(source_report("target", target, source))
}

pub(crate) fn cmd_to_interchange(conv: &TypeConverter, source: &str) -> ConversionResult<Report> {
    let source: SourceType = source.parse()?;
    let interchange = conv.to_interchange(&source)?.to_string();
    Ok(Report {
        json: json!({ "source": source.to_string(), "interchange": interchange }),
        text: interchange,
    })
}

pub(crate) fn cmd_interchange_to_target(
    conv: &TypeConverter,
    name: &str,
) -> ConversionResult<Report> {
    let target = conv.interchange_to_target(name)?;
    Ok(Report {
        json: json!({ "interchange": name, "target": target }),
        text: target,
    })
}

pub(crate) fn cmd_interchange_to_source(
    conv: &TypeConverter,
    name: &str,
) -> ConversionResult<Report> {
    let source = conv.interchange_to_source(name)?;
    Ok(source_report("interchange", name, source))
}

/// Reverse conversions report both the engine spelling and the structured
/// descriptor, since nested results carry defaults the spelling hides.
fn source_report(input_key: &str, input: &str, source: SourceType) -> Report {
    let mut json = json!({
        "source": source.to_string(),
        "descriptor": source,
    });
    json[input_key] = json!(input.trim());
    Report {
        text: source.to_string(),
        json,
    }
}
