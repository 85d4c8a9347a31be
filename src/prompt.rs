use crate::models::{GenerationRequest, Language};

pub const SYSTEM_PROMPT: &str = "You are a professional multilingual e-commerce copywriting assistant.";

/// FAQ copy is only produced once, in this language.
pub const FAQ_LANGUAGE: Language = Language::Chinese;

fn product_block(request: &GenerationRequest) -> String {
    format!(
        "[Product]: {}\n[Keywords]: {}\n[Selling points]: {}\n[Style]: {}",
        request.product_name, request.keywords, request.selling_points, request.style.label()
    )
}

pub fn build_prompt(request: &GenerationRequest, language: Language) -> String {
    let video_flag = if request.include_video_script { "short video script required" } else { "no short video script" };
    let mut sections = vec![
        "1. Title (within 30 characters)",
        "2. Subtitle (40-60 characters)",
        "3. Main body copy (3 paragraphs)",
        "4. Recommended social media one-liners",
        "5. Selling point summary (3 bullet points)",
    ];
    if request.include_video_script {
        sections.push("6. Short video subtitle script (5-10 subtitle lines)");
    }

    format!(
        "You are an AI specialised in writing multilingual e-commerce product copy. Generate content from the following product information:\n\n\
        {}\n[Language]: {} ({})\n[Extras]: {}\n\n\
        Produce the content in the following structure:\n{}\n\n\
        Respond entirely in {}.",
        product_block(request),
        language.name(),
        language.native_label(),
        video_flag,
        sections.join("\n"),
        language.name(),
    )
}

pub fn build_faq_prompt(request: &GenerationRequest) -> String {
    format!(
        "Write a customer FAQ for the product below as 5 question and answer pairs. \
        Format every pair as \"Q: ...\" on one line followed by \"A: ...\" on the next, with a blank line between pairs. \
        Cover usage, materials, shipping and after-sales concerns a shopper would raise.\n\n\
        {}\n\n\
        Respond entirely in {}.",
        product_block(request),
        FAQ_LANGUAGE.name(),
    )
}
