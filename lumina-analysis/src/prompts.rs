//! Fixed prompt templates.
//!
//! Prompts whose output gets parsed (fact-check, image, video) demand a
//! strict JSON object; the report-style prompts (URL safety, bias, neutral
//! news, social context) return natural-language reports that are passed
//! through verbatim.

const JSON_CONTRACT: &str = r#"Respond with only a JSON object, no text outside it, with exactly these keys:
  "verdict": string
  "analysis": string
  "confidence_score": integer from 0 to 100
  "confidence_explanation": plain-language explanation of the score"#;

pub fn fact_check(claim: &str, sources: &str) -> String {
    format!(
        "You are a fact-checking expert. Analyze the following claim in detail \
         for potential misinformation.\n\n\
         Claim: {claim}\n\n\
         Sources from trusted websites:\n{sources}\n\n\
         {JSON_CONTRACT}\n\n\
         \"verdict\" must be one of: true, false, misleading, partially true.\n\
         \"analysis\" must give 3-5 specific reasons supported by evidence from \
         the sources, correcting inaccuracies and discussing source credibility, \
         biases, logical fallacies, or lack of evidence.\n\n\
         Be objective, detailed, and evidence-based."
    )
}

pub fn image_authenticity() -> String {
    format!(
        "You are a forensic image analyst. Provide a detailed analysis of this \
         image for authenticity.\n\n\
         Examine the image closely for signs of manipulation, AI generation, or \
         faking. Consider lighting inconsistencies, shadow anomalies, edge \
         artifacts, unnatural proportions, blending errors, metadata clues, or \
         contextual mismatches.\n\n\
         {JSON_CONTRACT}\n\n\
         \"verdict\" must be one of: likely authentic, manipulated, AI-generated, unclear.\n\
         \"analysis\" must list 4-6 specific observations from the image that \
         support your verdict, with explanations, and discuss what they mean for \
         the image's use in media or claims.\n\n\
         Be thorough and evidence-driven."
    )
}

pub fn video_authenticity() -> String {
    format!(
        "You are a forensic video analyst. Provide a detailed analysis of this \
         video for authenticity, focusing on signs of deepfake or manipulation.\n\n\
         Examine the video for inconsistencies in motion, facial expressions, \
         lighting, audio sync (if present), unnatural artifacts, or contextual \
         mismatches across frames.\n\n\
         {JSON_CONTRACT}\n\n\
         \"verdict\" must be one of: likely authentic, manipulated, deepfake, unclear.\n\
         \"analysis\" must list 4-6 specific observations from the video that \
         support your verdict, with explanations, and discuss what they mean for \
         the video's use in media or claims.\n\n\
         Be thorough and evidence-driven. Limit analysis to short clips."
    )
}

pub fn url_safety(url: &str, sources: &str, content: &str) -> String {
    format!(
        "You are a web safety expert. Provide a detailed safety assessment of \
         this URL/website.\n\n\
         URL: {url}\n\n\
         External sources checked:\n{sources}\n\n\
         Scraped content from the site (preview):\n{content}\n\n\
         Deliver a comprehensive natural language report:\n\
         - Overall Safety Verdict: [safe, risky, or requires caution]\n\
         - Detailed Risk Analysis: [Break down 4-6 potential risks (e.g., \
         phishing indicators, malware signs, scam patterns, poor security) with \
         specific evidence]\n\
         - Content Breakdown: [Analyze key elements of the scraped content for red flags]\n\
         - Recommendations: [Advise on whether to visit, with reasons]\n\
         - Confidence: [Rate your assessment (high, medium, low) and explain]\n\n\
         Be precise, evidence-based, and thorough."
    )
}

pub fn bias_rating(source: &str, sources: &str) -> String {
    format!(
        "You are a media bias expert. Rate the political or ideological bias of \
         this news source.\n\n\
         Source: {source}\n\n\
         Bias information from databases:\n{sources}\n\n\
         Provide a report:\n\
         - Bias Rating: [Left, Center-Left, Center, Center-Right, Right, or Neutral]\n\
         - Balance Score: [1-10, 10 being most balanced]\n\
         - Detailed Analysis: [Explain based on evidence from sources]\n\
         - Tips: [Suggestions for balancing views, e.g., pair with opposing sources]\n\n\
         Be objective and evidence-based."
    )
}

pub fn neutral_news(article_content: &str, sources: &str) -> String {
    format!(
        "You are a neutral news summarizer. Provide a bias-free summary and \
         alternative perspectives for the given content, treating it as an \
         article even if it's short or a claim. Always generate the output \
         regardless of content length.\n\n\
         Article Content: {article_content}\n\n\
         Alternative sources:\n{sources}\n\n\
         Output exactly in this format:\n\
         - Neutral Summary: [A balanced, factual recap without bias.]\n\
         - Alternative Views: [List 3-5 sources with differing perspectives, \
         e.g., 1. Title (URL): Brief description of view.]\n\
         - Education: [Tips on identifying bias in the original content.]\n\n\
         Be objective and strictly follow the output format."
    )
}

pub fn social_context(post_url: &str, metadata: &str, claim: &str, fact_check: &str) -> String {
    format!(
        "You are a social media misinformation analyst. Analyze the context of \
         this social media post.\n\n\
         Post URL: {post_url}\n\
         Metadata: {metadata}\n\
         Extracted Claim: {claim}\n\
         Fact-Check Result: {fact_check}\n\n\
         Provide a report in this format:\n\
         - Context Analysis: [Analyze the poster's credibility, engagement \
         level, and potential misinformation campaign signs]\n\
         - Fact-Check Summary: [Summarize the fact-check result or state 'No \
         claim extracted' if none]\n\
         - Recommendations: [Advise users on interpreting the post, e.g., \
         'Check primary sources due to high virality']\n\n\
         Be objective and evidence-based."
    )
}

pub fn extract_topic(content: &str) -> String {
    format!("Extract the main topic from this article content in one sentence: {content}")
}

pub fn extract_claim(content: &str) -> String {
    format!(
        "Extract the main claim or statement from this social media post \
         content in one sentence. If there is none, respond with exactly \
         'No clear claim identified.': {content}"
    )
}
