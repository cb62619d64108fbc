// Prompt constants for the Job Analyzer.
// The section labels here are the headers `generative::parse_analysis_reply` looks for.

/// Job analysis prompt template. Replace `{job_description}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = "Analyze this job description and extract key information for resume tailoring:

JOB DESCRIPTION:
{job_description}

Please provide a structured analysis with the following:

1. REQUIRED SKILLS (must-have technical and soft skills)
2. PREFERRED SKILLS (nice-to-have skills)
3. KEY RESPONSIBILITIES (main duties and expectations)
4. COMPANY CULTURE INDICATORS (work style, values, environment)
5. KEYWORDS FOR OPTIMIZATION (important terms that should appear in resume)
6. ROLE FOCUS (technical vs leadership vs hybrid)

Format your response as structured text that can be easily parsed.
List one item per line under each numbered heading.
Focus on actionable insights for resume customization.";

pub fn job_analysis_prompt(job_description: &str) -> String {
    JOB_ANALYSIS_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_analysis_prompt_embeds_posting_and_sections() {
        let prompt = job_analysis_prompt("  Staff engineer at Acme\n");
        assert!(prompt.contains("JOB DESCRIPTION:\nStaff engineer at Acme\n"));
        for label in [
            "1. REQUIRED SKILLS",
            "2. PREFERRED SKILLS",
            "3. KEY RESPONSIBILITIES",
            "4. COMPANY CULTURE INDICATORS",
            "5. KEYWORDS FOR OPTIMIZATION",
            "6. ROLE FOCUS",
        ] {
            assert!(prompt.contains(label), "missing {label}");
        }
        assert!(!prompt.contains("{job_description}"));
    }
}
