use url::Url;

/// Region identifiers used in attraction paths, mapped to city names
pub const REGION_CITIES: &[(&str, &str)] = &[
    ("beijing1", "北京"),
    ("shanghai2", "上海"),
    ("guangzhou152", "广州"),
    ("shenzhen26", "深圳"),
];

/// Path prefix of attractions filed under the numeric Beijing region
const FALLBACK_PREFIX: &str = "/sight/1/";
const FALLBACK_CITY: &str = "北京";

/// Derives the city of an attraction from its URL
///
/// Looks at the region segment of `/sight/{region}/{id}.html`. Unknown
/// regions and unparsable URLs yield an empty string.
///
/// ```
/// use sight_crawler::url::city_from_url;
///
/// assert_eq!(city_from_url("https://you.ctrip.com/sight/shanghai2/762.html"), "上海");
/// assert_eq!(city_from_url("https://you.ctrip.com/sight/1/5.html"), "北京");
/// assert_eq!(city_from_url("https://you.ctrip.com/sight/lhasa36/5.html"), "");
/// ```
pub fn city_from_url(url: &str) -> &'static str {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return "",
    };

    let region = parsed
        .path_segments()
        .and_then(|mut segments| match segments.next() {
            Some("sight") => segments.next(),
            _ => None,
        });

    if let Some(region) = region {
        if let Some((_, city)) = REGION_CITIES.iter().find(|(key, _)| *key == region) {
            return city;
        }
    }

    if parsed.host_str() == Some("you.ctrip.com") && parsed.path().starts_with(FALLBACK_PREFIX) {
        return FALLBACK_CITY;
    }

    ""
}
