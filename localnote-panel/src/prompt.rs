//! The prompt formatting step applied before dispatch.

/// How the user's raw input becomes the prompt sent to the model.
///
/// Swappable per panel and applied before the dispatcher is invoked; the
/// transport never knows which style produced the prompt text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStyle {
    /// Send the input verbatim.
    Raw,
    /// Wrap the input in an instruction to reformat it as Markdown notes.
    #[default]
    MarkdownNotes,
}

impl PromptStyle {
    /// Produce the prompt text for `input`.
    #[must_use]
    pub fn apply(self, input: &str) -> String {
        match self {
            PromptStyle::Raw => input.to_string(),
            PromptStyle::MarkdownNotes => format!(
                r##"You will be taking notes and formatting them for use in a Markdown note-taking app. The notes will be provided to you as input.

Here are the steps you will follow:

1. Read the notes provided in the input:
<notes>
{input}
</notes>

2. Use the following markdown formatting to enhance the notes:
   - Use `#` for headings (e.g., `# Heading 1`, `## Heading 2`).
   - Use `-` or `*` for bullet points.
   - Use `1.` for numbered lists.
   - Use `**text**` for bold text and `*text*` for italic text.
   - Use `> text` for blockquotes.
   - Use `[[link]]` for internal links to other notes.
   - Use `![[image.png]]` for embedding images.
   - Use `---` for horizontal lines.

3. Ensure the final output is clean and visually appealing, making use of the markdown features effectively.

4. Write your formatted notes inside <formatted_notes> tags.

<formatted_notes>
</formatted_notes>"##
            ),
        }
    }
}
