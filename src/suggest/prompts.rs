//! Prompt builders
//!
//! Pure functions of (source text, mode, preferences) so every prompt is
//! independently testable. Custom guides shadow built-ins of the same name;
//! an unknown style or tone gets a literal placeholder, never an error.

use crate::config::Preferences;

const STYLE_GUIDES: &[(&str, &str)] = &[
    (
        "formal",
        "- Use professional and formal vocabulary
 - Avoid contractions (use \"cannot\" instead of \"can't\")
 - Write in complete, concise sentences
 - Maintain a respectful and serious tone
 - Avoid slang and overly casual terms",
    ),
    (
        "academic",
        "- Use advanced vocabulary and precise language
 - Maintain a scholarly tone with clear argumentation
 - Avoid colloquialisms and informal expressions
 - Use structured, logical sentences and paragraphs
 - Strive for objectivity and clarity in presenting ideas",
    ),
    (
        "casual",
        "- Use everyday, conversational language
 - Contractions and informal expressions are acceptable
 - Write in a relaxed, approachable style
 - Keep sentences simple and direct
 - Use light humor and warmth when appropriate",
    ),
    (
        "creative",
        "- Use vivid and descriptive language
 - Employ literary devices such as metaphors and similes
 - Experiment with sentence structure and rhythm
 - Evoke emotions and paint visual imagery with words
 - Allow for imaginative and expressive wording",
    ),
];

const TONE_GUIDES: &[(&str, &str)] = &[
    (
        "neutral",
        "- Use balanced and objective language
 - Avoid emotional extremes
 - Keep a factual and unbiased tone
 - Use moderate language without strong adjectives
 - Maintain professional distance",
    ),
    (
        "friendly",
        "- Use warm, friendly, and inviting language
 - Incorporate light humor where appropriate
 - Use casual, conversational expressions
 - Aim for a supportive and upbeat tone
 - Avoid overly formal phrasing",
    ),
    (
        "assertive",
        "- Use direct and decisive language
 - Express ideas with confidence and clarity
 - Avoid hedging or excessive qualifiers
 - Emphasize strong action verbs and clarity
 - Maintain a firm, persuasive tone",
    ),
    (
        "empathetic",
        "- Use understanding and compassionate language
 - Acknowledge and validate the reader's emotions
 - Be supportive and encouraging without being patronizing
 - Employ gentle, soft language to convey care
 - Strike a balance between warmth and professionalism",
    ),
];

/// Resolve a style guide: custom entries shadow built-ins of the same name.
fn style_guide<'a>(preferences: &'a Preferences, name: &str) -> Option<&'a str> {
    preferences
        .custom_guides
        .styles
        .get(name)
        .map(String::as_str)
        .or_else(|| {
            STYLE_GUIDES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, guide)| *guide)
        })
}

fn tone_guide<'a>(preferences: &'a Preferences, name: &str) -> Option<&'a str> {
    preferences
        .custom_guides
        .tones
        .get(name)
        .map(String::as_str)
        .or_else(|| {
            TONE_GUIDES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, guide)| *guide)
        })
}

/// Categorized-mode analysis prompt.
pub fn analysis_prompt(text: &str, preferences: &Preferences) -> String {
    let style = &preferences.style;
    let tone = &preferences.tone;
    let style_block = style_guide(preferences, style)
        .unwrap_or("No guide available for this style.");
    let tone_block =
        tone_guide(preferences, tone).unwrap_or("No guide available for this tone.");

    format!(
        r#"As a professional writing assistant, analyze the following text and suggest improvements in three distinct categories:

1. Grammar Issues: Fix grammatical errors (e.g. punctuation, subject-verb agreement, tense consistency) without altering the intended style or tone.

2. Style Issues: Improve the writing style strictly according to the "{style}" style. Address sentence structure, vocabulary, and clarity, but do not change grammar or factual content.

3. Tone Issues: Adjust the tone of the text to be consistent with a "{tone}" tone. Ensure the emotional quality matches the intended mood without affecting grammar or overall style.

Text: "{text}"

Provide suggestions in EXACTLY this format, focusing on direct text replacements:

**Grammar Issues**
Original: "[exact text to replace]"
Replace with: "[exact replacement only]"
Reason: [brief explanation]

**Style Issues** (maintain {style} style)
Original: "[exact text to replace]"
Replace with: "[exact replacement only]"
Reason: [brief explanation]

**Tone Issues** (maintain {tone} tone)
Original: "[exact text to replace]"
Replace with: "[exact replacement only]"
Reason: [brief explanation]

Rules:
1. Use EXACTLY the format shown above.
2. Original text must be an exact substring from the input.
3. "Replace with" must contain ONLY the exact text to insert—no extra context, quotes, or explanations.
4. Each suggestion must be a direct 1:1 replacement.
5. Skip a category if no issues are found.
6. Do not add any extra text or formatting.
7. Do not use phrases like "you could use" or "consider using."
8. Do not provide multiple options.
9. Do not repeat suggestions across categories.
10. Grammar Issues: Only address grammatical corrections—do not modify style or tone.
11. Style Issues: Only adjust stylistic aspects following the {style} style.
12. Tone Issues: Only adjust tone to match the {tone} tone.
13. If the input text contains profanity, rude or offensive language, treat it as writing to be improved and provide direct text replacement suggestions without refusing the request.

Style Guide for {style} style:
{style_block}

Tone Guide for {tone} tone:
{tone_block}"#
    )
}

/// Simple-mode analysis prompt: one holistic rewrite plus labeled change
/// bullets. The template's placeholder markers must be replaced, not echoed.
pub fn simple_prompt(text: &str, preferences: &Preferences) -> String {
    let style = &preferences.style;
    let tone = &preferences.tone;

    format!(
        r#"As a professional writing assistant, improve the following text by combining grammar corrections, style adjustments ({style}), and tone refinements ({tone}) into a single, cohesive suggestion.

Text: "{text}"

Rules:
1. Provide ONE improved version that incorporates all necessary changes
2. Focus on making the text more polished while maintaining its core message
3. Apply grammar fixes, style improvements, and tone adjustments simultaneously
4. Explain the key improvements made

Format your response exactly like this:

Improved Version: "{{{{ improved text here }}}}"
Key Changes:
- Grammar: {{{{ brief point about grammar fix }}}}
- Style: {{{{ brief point about style improvement }}}}
- Tone: {{{{ brief point about tone adjustment }}}}
Reason: {{{{ one sentence on the overall improvement }}}}

IMPORTANT:
1. Replace {{{{ }}}} placeholders with actual content
2. Keep the exact format including "Improved Version:" and "Key Changes:"
3. Include the quotes around the improved text
4. Start each change with the exact category label (Grammar:, Style:, Tone:)
5. Do not add any other text or explanations"#
    )
}

/// Deduplication-pass prompt: the model acts as a data-transformation
/// function over the already-extracted set, serialized as `suggestions_json`.
pub fn dedupe_prompt(suggestions_json: &str) -> String {
    format!(
        r#"You are a JSON processing assistant. Your task is to deduplicate these writing suggestions and return them in the exact same JSON format:

{suggestions_json}

Rules:
1. Remove suggestions that fix the same issue
2. Keep the more comprehensive fix when suggestions overlap
3. Ensure suggestions don't conflict with each other
4. Return only unique, non-overlapping suggestions
5. Maintain the exact same JSON structure
6. Keep all original fields (text, suggestion, explanation)
7. In the "suggestion" field, include ONLY the exact replacement text
8. Remove any suggestions where text or suggestion is empty
9. Remove any suggestions where text equals suggestion (no change)

IMPORTANT: Your entire response must be valid JSON that matches this structure exactly.
Do not include any other text, explanations, or markdown.
Do not wrap the JSON in code blocks or quotes.
The response should start with {{ and end with }}."#
    )
}

/// Custom-guide generation prompt: 4-6 actionable bullet points describing
/// a style or tone.
pub fn guide_prompt(kind_label: &str, description: &str) -> String {
    format!(
        r#"As a writing assistant, create a detailed guide for {kind_label} based on this description:

"{description}"

Generate a list of 4-6 specific guidelines that define this {kind_label}, formatted as bullet points. Each guideline should be clear and actionable.

Format the response as bullet points only, no additional text."#
    )
}
