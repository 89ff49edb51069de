use helpindex_core::ResourceLocation;

/// One `--lang CODE=LOCATION` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBinding {
    pub code: String,
    pub location: ResourceLocation,
}

pub(super) fn parse_language_binding(raw: &str) -> std::result::Result<LanguageBinding, String> {
    let (code, descriptor) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=LOCATION, got '{raw}'"))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing language code in '{raw}'"));
    }
    let location = ResourceLocation::parse(descriptor).map_err(|err| err.to_string())?;
    Ok(LanguageBinding {
        code: code.to_string(),
        location,
    })
}

pub(super) fn parse_min_one_u64(raw: &str) -> std::result::Result<u64, String> {
    let value = raw
        .parse::<u64>()
        .map_err(|_| format!("invalid integer value '{raw}'"))?;
    if value == 0 {
        return Err("value must be >= 1".to_string());
    }
    Ok(value)
}
