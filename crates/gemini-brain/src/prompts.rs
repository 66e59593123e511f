//! Prompt text and response schemas for creative generation.

use campaign_core::{IdeationConcept, Project, ProjectParams};
use serde_json::{json, Value};

/// Appended to every visual prompt before image generation.
pub const IMAGE_PROMPT_SUFFIX: &str =
    ", professional advertising photography, 8k, award winning, commercial lighting, vertical composition";

/// Returned when the report call produced no text.
pub const REPORT_FALLBACK: &str = "<p>Unable to generate report.</p>";

pub fn concepts_prompt(params: &ProjectParams, count: usize) -> String {
    format!(
        "Generate {count} advertising concepts for:\n\
         Brand: {}, Industry: {}, Product: {}, Audience: {}, Style: {}.\n\
         Return JSON array.",
        params.brand_name,
        params.industry,
        params.product_desc,
        params.target_audience,
        params.brand_style,
    )
}

pub fn concepts_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "angle": { "type": "STRING" },
                "headline": { "type": "STRING" },
                "hook": { "type": "STRING" },
                "mood": { "type": "STRING" },
                "typography": { "type": "STRING" },
                "colorPaletteSuggestion": { "type": "STRING" },
                "visualDirection": { "type": "STRING" }
            },
            "required": ["angle", "headline", "hook", "mood", "typography", "visualDirection"]
        }
    })
}

pub fn final_ads_prompt(params: &ProjectParams, concepts: &[IdeationConcept]) -> String {
    let context = concepts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "Concept {}: Angle=\"{}\", Visual=\"{}\", Mood=\"{}\"",
                i + 1,
                c.angle,
                c.visual_direction,
                c.mood
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let colors = if params.brand_colors.trim().is_empty() {
        "Brand standard colors"
    } else {
        params.brand_colors.as_str()
    };

    format!(
        "Create high-performance final ads for: {brand}.\n\
         Brand Colors: {colors}\n\
         \n\
         Approved Concepts:\n\
         {context}\n\
         \n\
         GENERATE 2 VARIATIONS PER CONCEPT (A/B TESTING):\n\
         For every selected concept, you MUST generate TWO distinct ad variations.\n\
         1. Variation A (Performance): Short, punchy, direct-response focused. Clear hard-hitting CTA.\n\
         2. Variation B (Story/Brand): More emotional, narrative-driven, or value-focused. Soft but persuasive CTA.\n\
         \n\
         COPYWRITING RULES:\n\
         - Headlines must be attention-grabbing and under 50 characters if possible.\n\
         - Body copy must be concise, punchy, and benefit-driven. Avoid fluff.\n\
         - CTAs must be action-oriented (e.g., \"Shop Now\", \"Get Started\", \"Learn More\").\n\
         \n\
         AUTO-SEO & METADATA REQUIREMENTS (STRICT):\n\
         1. Keywords: Extract 5-8 high-value keywords. Ensure high density in the rationale but natural flow in copy.\n\
         2. Hashtags: Generate 5-10 mixed hashtags (broad + niche). RELEVANCE IS KEY.\n\
         3. Meta Description: STRICTLY between 140-160 characters. Optimized for high Click-Through Rate (CTR) in search results.\n\
         4. Score: Calculate a realistic SEO score (0-100) based on keyword usage and readability.\n\
         \n\
         VISUAL PROMPT INSTRUCTIONS:\n\
         - Explicitly incorporate brand colors: {colors}.\n\
         - Describe a 3:4 Vertical composition.\n\
         - Specify lighting (e.g., \"soft studio lighting\", \"golden hour\") and texture.\n\
         \n\
         Generate a flat JSON array containing both variations for all concepts.",
        brand = params.brand_name,
    )
}

pub fn final_ads_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "platform": {
                    "type": "STRING",
                    "enum": ["facebook", "instagram", "linkedin", "twitter", "generic"]
                },
                "variantName": {
                    "type": "STRING",
                    "description": "e.g. 'Variation A' or 'Variation B'"
                },
                "headline": { "type": "STRING" },
                "body": { "type": "STRING" },
                "callToAction": { "type": "STRING" },
                "visualPrompt": { "type": "STRING" },
                "seo": {
                    "type": "OBJECT",
                    "properties": {
                        "keywords": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "hashtags": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "metaDescription": { "type": "STRING" },
                        "score": { "type": "NUMBER" },
                        "rationale": { "type": "STRING" }
                    },
                    "required": ["keywords", "hashtags", "metaDescription", "score", "rationale"]
                }
            },
            "required": [
                "platform", "headline", "body", "callToAction", "visualPrompt", "seo", "variantName"
            ]
        }
    })
}

pub fn image_prompt(visual_prompt: &str) -> String {
    format!("{}{}", visual_prompt.trim(), IMAGE_PROMPT_SUFFIX)
}

pub fn report_prompt(project: &Project) -> String {
    let ads = project
        .final_ads
        .iter()
        .enumerate()
        .map(|(i, ad)| {
            let (keywords, score) = match &ad.seo {
                Some(seo) => (seo.keywords.join(", "), seo.score.to_string()),
                None => (String::new(), String::new()),
            };
            format!(
                "Ad {} ({} - {}):\nHeadline: {}\nKeywords: {}\nScore: {}",
                i + 1,
                ad.platform.as_str(),
                ad.variant_name.as_deref().unwrap_or("Default"),
                ad.headline,
                keywords,
                score
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Generate a comprehensive Campaign SEO Report for: {} ({}).\n\
         \n\
         Ads Data:\n\
         {ads}\n\
         \n\
         The report should include:\n\
         1. Overall Campaign SEO Health Check.\n\
         2. Keyword Strategy Analysis (Are we targeting the right terms?).\n\
         3. Cross-Platform Optimization suggestions.\n\
         4. A \"Final Verdict\" summary.\n\
         \n\
         Format the output as clean, structured HTML (no markdown code blocks, just raw HTML tags like <h3>, <p>, <ul>).\n\
         Make it look professional.",
        project.name, project.params.industry,
    )
}

pub fn brand_search_prompt(url: &str) -> String {
    format!(
        "Analyze brand at: {url}\n\
         Perform a deep search for: Brand Name, Industry, Product Description, Audience, Colors, Style."
    )
}

pub fn brand_format_prompt(search_text: &str) -> String {
    format!("Extract the brand details from this text into JSON: {}", search_text)
}

pub fn brand_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "brandName": { "type": "STRING" },
            "industry": { "type": "STRING" },
            "productDesc": { "type": "STRING" },
            "targetAudience": { "type": "STRING" },
            "brandColors": { "type": "STRING" },
            "brandStyle": { "type": "STRING" }
        }
    })
}

/// Strip a surrounding markdown code fence from model output.
pub fn clean_json(text: &str) -> &str {
    strip_fence(text, &["```json", "```html", "```"])
}

fn strip_fence<'a>(text: &'a str, openers: &[&str]) -> &'a str {
    let mut body = text.trim();
    if let Some(opener) = openers.iter().find(|o| body.starts_with(**o)) {
        body = &body[opener.len()..];
    }
    body.strip_suffix("```").unwrap_or(body).trim()
}
