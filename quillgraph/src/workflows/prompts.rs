//! Prompt templates for the blog pipelines and judges.

use chrono::Local;

/// Frontmatter and layout rules shared by every MDX-producing step.
pub fn mdx_formatting_instructions() -> String {
    let date = Local::now().format("%Y-%m-%d").to_string();
    format!(
        r##"Ensure the final output is a well-formatted MDX file.
It must begin with a YAML frontmatter block containing **only** the following fields:
- title: A catchy, SEO-optimized title.
- date: "{date}" (this specific date must be used).
- tags: An array of relevant tags.
- draft: false.
- description: A concise, SEO-friendly description.

Do not include any additional fields.

Example frontmatter:
---
title: "Markdown Guide"
date: "{date}"
tags: ["github", "guide"]
draft: false
description: "Markdown cheatsheet for all your blogging needs - headers, lists, images, tables and more!"
---

**Important:**
- Do not include a Markdown H1 title (e.g., "# Title") in the main content; the title should only appear in the frontmatter.
- The date must be exactly as provided above.

After the frontmatter, output the main blog content in Markdown."##
    )
}

/// Applies `changes` to an existing MDX post.
pub fn modification(raw_mdx: &str, changes: &str) -> String {
    format!(
        "Below is an existing blog post in MDX format (including YAML frontmatter):
{raw_mdx}

Using the following modifications, update the blog post accordingly.
Ensure that the YAML frontmatter (title, date, tags, draft, description) is preserved.
Return only the modified MDX content (including the YAML frontmatter) with no additional commentary or explanation.
Suggested modifications: {changes}"
    )
}

pub fn basic_creation(input: &str) -> String {
    format!(
        "Using the input below, generate a complete blog post in MDX format.
{}

Input: {input}",
        mdx_formatting_instructions()
    )
}

pub fn extract_intentions(input: &str) -> String {
    format!(
        "Analyze the following input and extract a clear, concise statement of user intentions.
Output only the extracted intention, with no additional commentary or explanation.
Input: {input}"
    )
}

pub fn modification_intentions(changes: &str) -> String {
    format!(
        "Please analyze the following modification suggestions and explain in detail what changes are intended.
Modifications: {changes}"
    )
}

pub fn blog_from_intention(intention: &str) -> String {
    format!(
        "Using the following extracted intention:

{intention}

Generate a comprehensive blog post in MDX format.
{}",
        mdx_formatting_instructions()
    )
}

pub fn writer_initial(topic: &str) -> String {
    format!(
        "Write an engaging, informative, and creative blog post on the following topic:
\"{topic}\".
Ensure the post has a clear structure and engaging content."
    )
}

pub fn writer_revision(blog: &str, suggestions: &str) -> String {
    format!(
        "Revise the following blog post based on the suggestions provided.

Blog Post:
{blog}

Suggestions for improvement:
{suggestions}

Incorporate the suggestions to enhance clarity, structure, and overall engagement."
    )
}

pub fn critic(blog: &str) -> String {
    format!(
        "You are a seasoned blog critic. Review the following blog post and provide detailed, constructive feedback for improvement (e.g. clarity, structure, engagement, and depth).

Blog Post:
{blog}"
    )
}

pub fn format_blog(blog: &str) -> String {
    format!(
        "Format the following blog post into a perfectly formatted MDX file.
Use these formatting instructions:
{}

Blog Post:
{blog}",
        mdx_formatting_instructions()
    )
}

pub fn research_summary(topic: &str, search_results: &str) -> String {
    format!(
        "You are a research assistant. Summarize the following search results on the topic \"{topic}\" focusing on key insights and relevant information. Present a clear, concise summary.

Search Results:
{search_results}

Summary:"
    )
}

pub fn draft_blog(topic: &str, summary: &str) -> String {
    format!(
        "Write a comprehensive blog post on the topic \"{topic}\" using the following research summary. Structure the blog post into three sections: Introduction, Main Points, and Conclusion. Ensure the content is detailed, engaging, and accurate.

Research Summary:
{summary}

Blog Post Draft:"
    )
}

pub fn refine_blog(draft: &str) -> String {
    format!(
        "You are an expert editor. Refine the following blog draft for clarity, accuracy, and flow. Do not change the overall structure (Introduction, Main Points, Conclusion). Provide an improved version of the blog post.

Draft:
{draft}

Refined Draft:"
    )
}

pub fn seo(topic: &str, refined_draft: &str) -> String {
    format!(
        r#"You are an SEO expert. Optimize the following blog draft for search engine visibility. Do the following:
1. Propose a catchy, SEO-optimized title for the blog post.
2. Write a meta description (around 155 characters) that highlights the blog's content.
3. Ensure the blog post is well-structured with appropriate headings (Introduction, Main Points, Conclusion) and includes relevant keywords naturally.

Topic: "{topic}"
Blog Draft:
{refined_draft}

Provide the output in the following JSON format:
{{
  "title": string,
  "meta": string,
  "content": string
}}"#
    )
}

pub fn format_mdx(title: &str, meta: &str, content: &str) -> String {
    format!(
        "Format the following blog content into a well-formatted MDX file.
{}

Now format the content below into MDX:

Title: {title}

Meta Description: {meta}

Content:
{content}",
        mdx_formatting_instructions()
    )
}

pub fn assess_factuality(topic: &str, blog_content: &str) -> String {
    format!(
        r#"You are a content analyst. Given the blog topic and the content below, determine whether the blog is intended to be factual (i.e., based on verifiable information) or non-factual (e.g. fiction, satire, or fantasy).

Topic: "{topic}"
Blog Content:
{blog_content}

Output a JSON object with the following format:
{{
  "factual": true
}}
Set "factual" to false if the blog is non-factual."#
    )
}

pub fn extract_claims(blog_content: &str) -> String {
    format!(
        r#"You are a fact-checking assistant. Extract all factual claims from the following blog post.

- Identify sentences that assert real-world facts.
- For each claim, indicate whether it is verifiable using credible sources.
- Exclude opinions or subjective statements.

Output a JSON object with the following format:
{{
  "claims": [
    {{ "text": "Claim text here.", "is_verifiable": true }},
    {{ "text": "Another claim.", "is_verifiable": false }}
  ]
}}

Blog Content:
{blog_content}"#
    )
}

pub fn fact_check_with_search(claim: &str, search_results: &str) -> String {
    format!(
        r#"You are a fact-checking assistant. Verify the following factual claim using the provided external search results.

Claim: "{claim}"

External Search Results:
{search_results}

Based on these results, decide whether the claim is:
- TRUE: Supported by credible sources.
- FALSE: Contradicted by credible sources.
- UNCERTAIN: Insufficient evidence.

Output a JSON object with this format:
{{
  "text": "<original claim>",
  "verifiable": true,
  "correctness": "<true|false|uncertain>",
  "source": "<a credible source URL, or an empty string if unavailable>",
  "explanation": "<brief explanation>"
}}"#
    )
}

pub fn relevance_judge(topic: &str, generated_content: &str) -> String {
    format!(
        r#"You are an expert evaluator assessing whether an AI-generated blog post aligns with the intended topic.

- **Topic:** "{topic}"
- **Generated Blog Post:**
{generated_content}

Evaluate the **relevance and intent alignment** of the generated blog post:
- Does it directly address the topic?
- Does it stay focused without unnecessary tangents?
- Does it provide useful, specific information related to the topic?

Assign a **score from 0 to 10**, where:
- **0-3**: Completely off-topic or misleading.
- **4-6**: Partially relevant but contains some off-topic sections.
- **7-9**: Highly relevant with minor deviations.
- **10**: Perfectly aligned with the topic.

Output a JSON object matching this format:
{{
  "score": (number, from 0 to 10),
  "explanation": (string, a brief justification for the score)
}}"#
    )
}
