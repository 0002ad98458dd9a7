use crate::prompt::common::{SYSTEM_INSTRUCTION, TASK_INSTRUCTIONS};

/// One competitor's page text, labelled with the URL it came from.
#[derive(Clone, Debug)]
pub struct CompetitorContent {
    pub url: String,
    pub content: String,
}

/// Generate the competitor analysis prompt. Section order is fixed: system
/// instruction, keywords, client content, one block per competitor in input
/// order, then the task list. Competitors with empty content keep their
/// block so numbering stays aligned with the input.
pub fn competitor_analysis_prompt(
    client_content: &str,
    competitors: &[CompetitorContent],
    primary_keyword: &str,
    secondary_keywords: &[String],
) -> String {
    let mut competitor_blocks = String::new();
    for (index, competitor) in competitors.iter().enumerate() {
        competitor_blocks.push_str(&format!(
            "Competitor {number} - {url}:\n{content}\n\n",
            number = index + 1,
            url = competitor.url,
            content = competitor.content
        ));
    }

    format!(
        "System instruction:\n{system_instruction}\n\nPrimary keyword: {primary}\nSecondary keywords: {secondary}\n\nClient content:\n{client}\n\n{competitor_blocks}{tasks}",
        system_instruction = SYSTEM_INSTRUCTION,
        primary = primary_keyword,
        secondary = secondary_keywords.join(", "),
        client = client_content,
        competitor_blocks = competitor_blocks,
        tasks = TASK_INSTRUCTIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(url: &str, content: &str) -> CompetitorContent {
        CompetitorContent {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let competitors = vec![
            competitor("https://one.example", "D1"),
            competitor("https://two.example", "D2"),
        ];
        let secondary = vec!["a".to_string(), "b".to_string()];
        let prompt = competitor_analysis_prompt("C", &competitors, "x", &secondary);

        let positions = [
            prompt.find("System instruction:").unwrap(),
            prompt.find("Primary keyword: x").unwrap(),
            prompt.find("Secondary keywords: a, b").unwrap(),
            prompt.find("Client content:\nC").unwrap(),
            prompt.find("Competitor 1 - https://one.example:\nD1").unwrap(),
            prompt.find("Competitor 2 - https://two.example:\nD2").unwrap(),
            prompt.find("Tasks:").unwrap(),
        ];
        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_starts_with_system_instruction() {
        let prompt = competitor_analysis_prompt("C", &[], "x", &[]);
        assert!(prompt.starts_with("System instruction:\nYou are a Competitive Intelligence Analyst"));
    }

    #[test]
    fn test_empty_competitor_content_keeps_numbered_block() {
        let competitors = vec![
            competitor("https://one.example", "D1"),
            competitor("https://two.example", ""),
            competitor("https://three.example", "D3"),
        ];
        let prompt = competitor_analysis_prompt("C", &competitors, "x", &[]);
        assert!(prompt.contains("Competitor 2 - https://two.example:\n\n"));
        assert!(prompt.contains("Competitor 3 - https://three.example:\nD3"));
    }

    #[test]
    fn test_no_competitors_still_lists_tasks() {
        let prompt = competitor_analysis_prompt("C", &[], "x", &[]);
        assert!(!prompt.contains("Competitor 1"));
        assert!(prompt.contains("Tasks:"));
        assert!(prompt.contains("- strategicOverview (string)"));
        assert!(prompt.contains("- gscData (array or empty)"));
        assert!(prompt.contains("- notes (optional string)"));
    }

    #[test]
    fn test_empty_secondary_keywords_leave_line_blank() {
        let prompt = competitor_analysis_prompt("C", &[], "x", &[]);
        assert!(prompt.contains("Secondary keywords: \n"));
    }

    #[test]
    fn test_competitor_order_matches_input_order() {
        let competitors = vec![
            competitor("https://z.example", "later in alphabet, first in input"),
            competitor("https://a.example", "earlier in alphabet, second in input"),
        ];
        let prompt = competitor_analysis_prompt("C", &competitors, "x", &[]);
        let z = prompt.find("Competitor 1 - https://z.example:").unwrap();
        let a = prompt.find("Competitor 2 - https://a.example:").unwrap();
        assert!(z < a);
    }
}
