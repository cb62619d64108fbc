// Prompt constants for the Job-Posting Extractor.
// The `##` headings and `Label:` fields are what `parse::parse_extraction_reply` reads back.

/// Extraction prompt template. Replace `{posting_text}` before sending.
pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = "Extract structured job information from this job posting text. \
Parse all relevant details for resume customization.

JOB POSTING TEXT:
{posting_text}

Please extract and structure the following information in a clear, parseable format:

## BASIC INFO
- Company Name: [exact company name]
- Job Title: [exact role title]
- Location: [work location/remote info]
- Job Type: [full-time, contract, etc.]
- Experience Level: [junior, mid, senior, executive]
- Salary Range: [if mentioned]

## JOB DESCRIPTION
[Clean, formatted version of the job description suitable for markdown]

## KEY REQUIREMENTS (must-have)
- [List each required skill/qualification]
- [Include years of experience if specified]
- [Technical skills, education, certifications]

## NICE TO HAVE (preferred)
- [List each preferred skill/qualification]
- [Bonus qualifications]
- [Preferred experience]

## COMPANY CULTURE & VALUES
[Description of company culture, work environment, values mentioned in posting]

## ADDITIONAL DETAILS
[Any other relevant information like benefits, growth opportunities, team structure]

Format your response clearly with headers and bullet points for easy parsing.
Focus on information that would be useful for tailoring a resume.";

pub fn job_extraction_prompt(posting_text: &str) -> String {
    JOB_EXTRACTION_PROMPT_TEMPLATE.replace("{posting_text}", posting_text.trim())
}
