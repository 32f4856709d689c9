// Fixed cold-email templates shown on the preview screen.
// Only the experience level is interpolated; no other input changes the text.

use crate::wizard::models::{ExperienceLevel, GeneratedEmail};

/// Subject of the first variant. Replace `{seniority}` before use.
pub const FIRST_SUBJECT_TEMPLATE: &str =
    "Passionate {seniority} Developer - Application for Your Team";

pub const FIRST_BODY: &str = r#"Dear Hiring Manager,

I hope this message finds you well. I recently came across your job posting and was immediately drawn to the opportunity to contribute to your team.

With my background in software development and genuine passion for creating innovative solutions, I believe I would be a valuable addition to your organization. My experience aligns well with the requirements you've outlined, particularly in areas of modern web development and collaborative team environments.

I've attached my resume for your review and would welcome the opportunity to discuss how my skills and enthusiasm can contribute to your team's success. Thank you for considering my application.

Best regards,
[Your Name]"#;

/// Subject of the second variant. Replace `{position}` before use.
pub const SECOND_SUBJECT_TEMPLATE: &str = "Re: {position} Position - Let's Connect";

pub const SECOND_BODY: &str = r#"Hello,

I was excited to discover your recent job posting, as it perfectly aligns with my career aspirations and technical expertise.

As someone who thrives in dynamic environments and enjoys tackling complex challenges, I'm particularly interested in how this role could leverage my skills while contributing to your team's objectives. My background has prepared me well for the responsibilities outlined in your posting.

I would love to learn more about your team's current projects and discuss how my experience and fresh perspective could benefit your organization. Would you be available for a brief conversation this week?

Looking forward to your response.

Warm regards,
[Your Name]"#;

/// Builds the two preview emails. Entry level reads "Junior" / "Entry-Level";
/// every other level reads "Senior" / "Experienced".
pub fn build_emails(experience: ExperienceLevel) -> Vec<GeneratedEmail> {
    let (seniority, position) = if experience.is_entry() {
        ("Junior", "Entry-Level")
    } else {
        ("Senior", "Experienced")
    };

    vec![
        GeneratedEmail {
            id: 1,
            subject: FIRST_SUBJECT_TEMPLATE.replace("{seniority}", seniority),
            body: FIRST_BODY.to_string(),
        },
        GeneratedEmail {
            id: 2,
            subject: SECOND_SUBJECT_TEMPLATE.replace("{position}", position),
            body: SECOND_BODY.to_string(),
        },
    ]
}
