//! The fixed study-notes instruction that wraps every submission.

/// Marker separating the instructions from the user's text
pub const RAW_CONTENT_MARKER: &str = "--- RAW CONTENT ---";

const INSTRUCTIONS: &str = "\
You are a professional study genius. Your only task is to transform the provided raw content into highly aesthetic, structured, and easy-to-digest study notes. You must use Markdown and engaging emojis.

1. **Vibe Check Summary:** Start with a 1-2 sentence **bold** summary of the core topic, like a TikTok caption.
2. **🧠 Core Takeaways:** Use 5-7 concise bullet points. Start each with an engaging emoji.
3. **✨ Key Terms & Definitions:** Create a table for quick reference.
4. **💡 The Main Event:** Use H3 headings to break down the main content into digestible chunks.
";

/// Embed `raw_content` verbatim into the study-notes template.
pub fn build_prompt(raw_content: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + raw_content.len() + 32);
    prompt.push_str(INSTRUCTIONS);
    prompt.push('\n');
    prompt.push_str(RAW_CONTENT_MARKER);
    prompt.push('\n');
    prompt.push_str(raw_content);
    prompt.push('\n');
    prompt
}
