use crate::model::Bookmark;
use crate::types::SummaryLanguage;

/// Prompt asking for a summary of one highlight, in the configured language.
pub fn build_prompt(bookmark: &Bookmark, language: SummaryLanguage) -> String {
    match language {
        SummaryLanguage::English => english_prompt(bookmark),
        SummaryLanguage::TraditionalChinese => chinese_prompt(bookmark),
    }
}

fn english_prompt(bookmark: &Bookmark) -> String {
    let mut prompt = format!(
        "The following is a highlight from the book \"{}\"",
        bookmark.book_title
    );
    if !bookmark.author.is_empty() {
        prompt.push_str(&format!(" by {}", bookmark.author));
    }
    prompt.push_str(".\n```\n");
    prompt.push_str(&bookmark.text);
    prompt.push_str("\n```\n");

    if let Some(annotation) = &bookmark.annotation {
        prompt.push_str(&format!("The reader noted: \"{}\"\n", annotation));
    }

    prompt.push_str(
        "Summarize the highlight in one or two plain sentences. \
         Answer with the summary only, without headings, markdown or extra commentary.",
    );
    prompt
}

fn chinese_prompt(bookmark: &Bookmark) -> String {
    let mut prompt = format!("以下是從《{}》節錄的重點", bookmark.book_title);
    if !bookmark.author.is_empty() {
        prompt.push_str(&format!("（作者：{}）", bookmark.author));
    }
    prompt.push_str("：\n```\n");
    prompt.push_str(&bookmark.text);
    prompt.push_str("\n```\n");

    if let Some(annotation) = &bookmark.annotation {
        prompt.push_str(&format!("讀者的筆記：「{}」\n", annotation));
    }

    prompt.push_str(
        "請以繁體中文用一到兩句話濃縮這段重點。直接回答摘要，不要有標題、markdown 或任何額外說明。\
         中、英文及數字間以半形空格隔開。",
    );
    prompt
}
