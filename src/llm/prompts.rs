//! Prompt construction for chunk summaries and the combine pass.

use crate::llm::client::GenerationRequest;

/// Marker placed between chunk summaries in the combine request.
pub const SECTION_SEPARATOR: &str = "\n---\n";

const MINUTES_SYSTEM_PROMPT: &str = "You turn meeting transcripts into structured meeting minutes. \
Extract participants, discussion points, decisions and action items, and write them as clean \
Markdown. Never repeat a header or a section.";

const COMBINE_SYSTEM_PROMPT: &str =
    "You merge several partial sets of meeting minutes from one meeting into a single coherent set.";

/// Build the request that summarizes one transcript chunk.
pub fn build_chunk_request(
    chunk: &str,
    max_points: Option<u32>,
    style: Option<&str>,
) -> GenerationRequest {
    let mut user = format!(
        "Write meeting minutes for the transcript below using exactly this layout:\n\
\n\
# Meeting Minutes\n\
\n\
**Meeting Overview:**\n\
- **Date:** <date from the transcript, or 'Not specified'>\n\
- **Main Topic:** <main topic>\n\
\n\
**Participants:**\n\
<participants named in the transcript>\n\
\n\
**Key Discussion Points:**\n\
<bullet points>\n\
\n\
**Important Decisions Made:**\n\
<bullet points>\n\
\n\
**Action Items:**\n\
<one per line: [Owner] - Task - [Due: Date]>\n\
\n\
**Follow-up Meetings or Deadlines:**\n\
<next steps>\n\
\n\
Rules:\n\
- Keep the section titles exactly as shown and do not repeat any of them.\n\
- Use bullet points for lists.\n\
- Write 'Not specified' for a missing owner or date.\n\
- Use only information present in the transcript.\n\
\n\
Transcript:\n\
\n\
{chunk}"
    );

    if let Some(points) = max_points {
        user.push_str(&format!(
            "\n\nLimit the minutes to approximately {points} key points."
        ));
    }
    if let Some(style) = style.map(str::trim).filter(|s| !s.is_empty()) {
        user.push_str(&format!("\n\nUse a {style} style."));
    }

    GenerationRequest::new(MINUTES_SYSTEM_PROMPT, user)
}

/// Build the single request that merges chunk summaries in narrative order.
pub fn build_combine_request(summaries: &[String]) -> GenerationRequest {
    let user = format!(
        "The sections below are consecutive parts of the minutes of one meeting, in the order \
the meeting happened. Merge them into one set of minutes with the same layout. Remove \
duplicated headers and repeated content, and keep every piece of information that appears \
in any section.\n\
\n\
Sections:\n\
\n\
{}",
        summaries.join(SECTION_SEPARATOR)
    );

    GenerationRequest::new(COMBINE_SYSTEM_PROMPT, user)
}
