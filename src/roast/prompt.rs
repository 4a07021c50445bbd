//! Prompt rendering for the roast request

use crate::item::{ItemRecord, Rating};

/// System message sent with every roast request
pub const SYSTEM_PROMPT: &str = "你是一位风趣、毒舌的影评人，请用中文回答。";

/// Renders one item as a prompt bullet
///
/// `- 《title》(评分: 4/5, 短评: "comment")`; an unrated item reads
/// `评分: N/A` and an empty comment drops the `短评` part.
pub fn format_item(item: &ItemRecord) -> String {
    let rating = match item.rating {
        Rating::Stars(n) => format!("{}/5", n),
        Rating::NotAvailable => "N/A".to_string(),
    };

    if item.comment.is_empty() {
        format!("- 《{}》(评分: {})", item.title, rating)
    } else {
        format!(
            "- 《{}》(评分: {}, 短评: \"{}\")",
            item.title, rating, item.comment
        )
    }
}

/// Renders the whole list, one bullet per line
pub fn format_item_list(items: &[ItemRecord]) -> String {
    items.iter().map(format_item).collect::<Vec<_>>().join("\n")
}

/// Builds the user prompt for a profile's watched list
pub fn build_prompt(user_id: &str, items: &[ItemRecord]) -> String {
    format!(
        "你是一位嘴臭老哥。这是豆瓣用户 ({user_id}) 看过的电影列表。请用最恶毒的语气，幽默的风格，吐槽一下这位用户的观影品味，可以关注打分以及短评。\n\n用户 {user_id} 看过的电影：\n{list}\n\n请开始你的吐槽：",
        user_id = user_id,
        list = format_item_list(items)
    )
}
