//! Post text composition
//!
//! The composer is pure apart from the hashtag draw, which comes from the
//! caller's generator.

use rand::Rng;

/// Token in the affiliate link template replaced by the encoded video URL
pub const VIDEO_URL_PLACEHOLDER: &str = "{{videoUrl}}";

/// Lead-in before the affiliate link
pub const AFFILIATE_LEAD_IN: &str = "Watch here: ";

/// Text used when the operator gives no custom text
pub fn default_base_text(video_url: &str) -> String {
    format!("Check out this trending video: {}", video_url)
}

/// Substitute the URL-encoded video URL into the template
///
/// Returns `None` for a missing or blank template. Only the first placeholder
/// is replaced.
pub fn resolve_affiliate_link(template: Option<&str>, video_url: &str) -> Option<String> {
    let template = template.filter(|t| !t.trim().is_empty())?;
    let encoded = urlencoding::encode(video_url);
    Some(template.replacen(VIDEO_URL_PLACEHOLDER, &encoded, 1))
}

/// Build the final post text
///
/// Appends one randomly chosen hashtag group and the resolved affiliate link,
/// each after a blank line.
pub fn compose<R: Rng + ?Sized>(
    base_text: &str,
    hashtag_groups: &[String],
    affiliate_link_template: Option<&str>,
    video_url: &str,
    rng: &mut R,
) -> String {
    let link = resolve_affiliate_link(affiliate_link_template, video_url);
    compose_with_link(base_text, hashtag_groups, link.as_deref(), rng)
}

/// Same as [`compose`] but with the affiliate link already resolved
pub fn compose_with_link<R: Rng + ?Sized>(
    base_text: &str,
    hashtag_groups: &[String],
    affiliate_link: Option<&str>,
    rng: &mut R,
) -> String {
    let mut text = base_text.to_string();

    if !hashtag_groups.is_empty() {
        let group = &hashtag_groups[rng.gen_range(0..hashtag_groups.len())];
        text.push_str("\n\n");
        text.push_str(group);
    }

    if let Some(link) = affiliate_link {
        text.push_str("\n\n");
        text.push_str(AFFILIATE_LEAD_IN);
        text.push_str(link);
    }

    text
}
