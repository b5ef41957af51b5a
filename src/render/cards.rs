//! Review card markup
//!
//! Every card uses the same inline-styled layout so live, cached and
//! fallback reviews look identical on the page.

use crate::data::Review;

/// Most reviews shown at once
pub const MAX_REVIEWS: usize = 3;

/// Longest review text shown before truncation, in characters
pub const MAX_TEXT_CHARS: usize = 200;

/// Appended to truncated review text
pub const ELLIPSIS: &str = "...";

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

const CARD_STYLE: &str = "background: white; padding: 35px 30px; border-radius: 15px; box-shadow: 0 5px 20px rgba(0,0,0,0.08); position: relative; border-top: 4px solid #5cb85c;";
const STARS_STYLE: &str = "color: #ffa500; font-size: 20px; margin-bottom: 20px;";
const TEXT_STYLE: &str = "color: #333; font-size: 15px; line-height: 1.7; margin-bottom: 25px; font-style: italic;";
const FOOTER_STYLE: &str = "border-top: 2px solid #f0f0f0; padding-top: 15px;";
const AUTHOR_STYLE: &str = "font-weight: 700; color: #1e3a5f; margin: 0; font-size: 16px;";

/// Renders `rating` filled stars followed by empty stars up to five
///
/// Ratings outside 0-5 are clamped.
pub fn star_indicator(rating: i32) -> String {
    let filled = rating.clamp(0, 5) as usize;
    let mut stars = String::with_capacity(5 * FILLED_STAR.len_utf8());
    stars.extend(std::iter::repeat(FILLED_STAR).take(filled));
    stars.extend(std::iter::repeat(EMPTY_STAR).take(5 - filled));
    stars
}

/// Cuts `text` to its first 200 characters plus an ellipsis when longer
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Escapes text for insertion into HTML element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders one review card
pub fn render_card(review: &Review) -> String {
    format!(
        r#"
    <div style="{card}">
        <div style="{stars_style}">{stars}</div>
        <p style="{text_style}">"{text}"</p>
        <div style="{footer}">
            <p style="{author_style}">{author}</p>
        </div>
    </div>
"#,
        card = CARD_STYLE,
        stars_style = STARS_STYLE,
        stars = star_indicator(review.rating),
        text_style = TEXT_STYLE,
        text = escape_html(&truncate_text(&review.text)),
        footer = FOOTER_STYLE,
        author_style = AUTHOR_STYLE,
        author = escape_html(&review.author_name),
    )
}

/// Renders up to three cards in input order
pub fn render_reviews(reviews: &[Review]) -> String {
    reviews.iter().take(MAX_REVIEWS).map(render_card).collect()
}

/// The fixed reviews shown when live data is unavailable
pub fn fallback_reviews() -> Vec<Review> {
    vec![
        Review::new(
            "Sarah M.",
            5,
            "I can't say enough about this company. The owner and his crew are amazing. They transformed my lawn and did a wonderful landscaping job around my pool cage.",
        ),
        Review::new(
            "John D.",
            5,
            "Super professional, loved the new design they put in for us. Would use again when we do our next landscape project. Highly recommend.",
        ),
        Review::new(
            "Lisa W.",
            5,
            "Absolutely amazing job! Very professional team. I never have to worry about the job being done. Would 100% recommend them over anyone else in Citrus county!",
        ),
    ]
}

/// Markup for the fallback reviews
pub fn render_fallback() -> String {
    render_reviews(&fallback_reviews())
}
