//! Prompt Templates
//!
//! Builders turning request data into the prompts sent to the model
//! pool. Each builder returns `None` when the data it needs is missing.

use serde_json::Value;

use crate::upstream::AuthUser;

/// Tone name → prompt wording
fn tone_description(tone: &str) -> &'static str {
    match tone {
        "confident" => "bold, self-assured and results-oriented",
        "friendly" => "warm, approachable and personable",
        "enthusiastic" => "energetic, passionate and excited",
        "formal" => "highly formal, corporate and respectful",
        "warm" => "friendly yet professional with a personal touch",
        _ => "professional, polished and confident",
    }
}

/// Length name → prompt wording
fn length_guideline(length: &str) -> &'static str {
    match length {
        "short" => "Keep it concise: 120-180 words (3-4 short paragraphs)",
        "detailed" => {
            "In-depth and thorough: 320-450 words (5-7 paragraphs with specific examples)"
        }
        _ => "Balanced length: 200-300 words (4-5 paragraphs)",
    }
}

fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

/// First-person bio prompt for a talent profile
pub fn talent_bio(data: &Value, user: &AuthUser) -> Option<String> {
    let profile = data.get("profile")?;
    profile.as_object()?;

    let name = text(profile, "name").unwrap_or(&user.name);
    let title = text(profile, "title").unwrap_or("freelancer");
    let badge = text(profile, "badge").unwrap_or("verified");
    let rating = number(profile, "rating").unwrap_or(0.0);
    let jobs_completed = number(profile, "jobs_completed").unwrap_or(0.0) as u64;
    let pricing = number(profile, "pricing").unwrap_or(0.0);

    let skills = text(profile, "skills")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(5)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Some(format!(
        "\
You are an elite profile copywriter.

Write a powerful, first-person bio for {name} in MAX 500 characters (including spaces).

Current title: {title}
Badge: {badge}
Rating: {rating:.1}/5
Jobs completed: {jobs_completed}
Rate: ${pricing}/hr
Top skills: {skills}

Rules:
- First person
- Zero filler words
- Instantly shows expertise + results
- Ends with a hook
- Under 500 chars total

Just output the bio. Nothing else."
    ))
}

/// Third-person "About Us" prompt for a client profile
pub fn client_about_us(data: &Value) -> Option<String> {
    let profile = data.get("profile")?;
    let company = profile.get("company").cloned().unwrap_or(Value::Null);

    let name = text(&company, "name")
        .or_else(|| text(profile, "name"))?
        .to_string();
    let industry = text(&company, "industry").unwrap_or("technology");

    let country = company
        .get("country")
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .or_else(|| {
            profile
                .get("user")
                .and_then(|u| u.get("country"))
                .and_then(|c| c.get("name"))
                .and_then(Value::as_str)
        })
        .unwrap_or_default();

    let stats = profile.get("stats").cloned().unwrap_or(Value::Null);
    let jobs_posted = number(&stats, "jobs_posted_count").unwrap_or(0.0) as u64;
    let spend = number(&stats, "total_spend")
        .filter(|s| *s > 0.0)
        .map(|s| format!("Total spend: ${s}+"))
        .unwrap_or_default();

    let country_text = if country.is_empty() {
        String::new()
    } else {
        format!(" - {country}")
    };

    Some(format!(
        "\
Write a sharp, trust-building \"About Us\" blurb (third person) for this client.

Company: {name}
Industry: {industry}{country_text}
Jobs posted: {jobs_posted}
{spend}

Requirements:
- Max 700 characters (including spaces)
- Professional & credible
- Shows they're serious about hiring top talent
- No generic fluff

Just output the final text. Nothing else."
    ))
}

/// Job post description prompt
pub fn job_description(data: &Value) -> Option<String> {
    let job = data.get("job")?;

    let title = text(job, "title")?.to_string();
    let job_type = text(job, "job_type").unwrap_or("freelance");
    let experience_level = text(job, "experience_level").unwrap_or("any");
    let duration = text(job, "estimated_duration").unwrap_or("not specified");

    let skills = job
        .get("required_skills")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "relevant skills".to_string());

    let budget = number(job, "budget")
        .filter(|b| *b > 0.0)
        .map(|b| format!("Budget: ${b}"))
        .unwrap_or_default();

    Some(format!(
        "\
Write a clear, attractive job post description for this role.

Title: {title}
Type: {job_type}
Experience level: {experience_level}
Required skills: {skills}
Estimated duration: {duration}
{budget}

Requirements:
- 400-700 characters (including spaces)
- Concrete scope and expectations, no vague promises
- Speaks directly to qualified candidates
- No generic fluff

Just output the final text. Nothing else."
    ))
}

/// Proposal cover letter prompt for a talent applying to a job
pub fn proposal_cover_letter(data: &Value, user: &AuthUser) -> Option<String> {
    let talent = data.get("talent")?;
    let job = data.get("job")?;
    let metadata = data.get("metadata").cloned().unwrap_or(Value::Null);

    let job_title = text(job, "title")?.to_string();

    let client_name = job
        .get("third_party_metadata")
        .and_then(|m| m.get("company_name"))
        .and_then(Value::as_str)
        .or_else(|| {
            job.get("client")
                .and_then(|c| c.get("name"))
                .and_then(Value::as_str)
        })
        .unwrap_or("the client");

    let job_type = text(job, "job_type").unwrap_or("freelance");
    let experience_level = text(job, "experience_level").unwrap_or("any");
    let duration = text(job, "estimated_duration").unwrap_or("not specified");

    let required_skills = job
        .get("required_skills")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "relevant skills".to_string());

    let rating = number(talent, "rating").unwrap_or(0.5);
    let badge = match text(talent, "badge").unwrap_or_default() {
        "pro" => "Pro",
        "star" => "Top-Rated Star",
        _ => "verified talent",
    };

    let tone = tone_description(text(&metadata, "tone").unwrap_or("professional"));
    let length = length_guideline(text(&metadata, "length").unwrap_or("medium"));
    let notes = text(&metadata, "additional_notes")
        .filter(|n| !n.is_empty())
        .map(|n| format!("Additional notes from {}: {n}", user.name))
        .unwrap_or_default();

    Some(format!(
        "\
Write a winning proposal cover letter from {name} ({badge}, rated {rating:.1}/5) \
applying to the job below.

Job title: {job_title}
Client: {client_name}
Type: {job_type}
Experience level: {experience_level}
Required skills: {required_skills}
Estimated duration: {duration}

Tone: {tone}
{length}
{notes}

Rules:
- First person, addressed to {client_name}
- Connect {name}'s experience directly to the job requirements
- No generic openers, no flattery padding
- End with a clear, confident call to action

Just output the letter. Nothing else.",
        name = user.name,
    ))
}

/// Categorization prompt matching a job description to a category slug
pub fn job_categorization(description: &str, slugs: &[String]) -> String {
    let truncated: String = description.chars().take(350).collect();

    format!(
        "\
You are a job categorization assistant. Your task is to match jobs to predefined categories.

IMPORTANT: You must ONLY respond with the exact category slug from the list. Do not add any explanation or additional text.

Job Description: {truncated}

Available category slugs: {slugs:?}

Rules:
- Return ONLY the category slug that best matches the job description
- If no category matches, return exactly \"other\"
- Do not add any other text or explanation
- The response must be lowercase"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> AuthUser {
        AuthUser {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            public_id: "usr-1".into(),
            is_active: true,
            email_verified: true,
            complete_profile: true,
            username: None,
            avatar: None,
            is_staff: false,
            is_talent: true,
            is_client: false,
        }
    }

    #[test]
    fn talent_bio_includes_profile_fields() {
        let data = json!({
            "profile": {
                "name": "Ada Lovelace",
                "title": "Systems Engineer",
                "skills": "rust, tokio, axum, sql, docker, extra-skill",
                "rating": 4.87,
                "jobs_completed": 42,
                "pricing": 95,
                "badge": "pro"
            }
        });

        let prompt = talent_bio(&data, &user()).unwrap();
        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Systems Engineer"));
        assert!(prompt.contains("4.9/5"));
        assert!(prompt.contains("rust, tokio, axum, sql, docker"));
        // Only the first five skills are listed.
        assert!(!prompt.contains("extra-skill"));
    }

    #[test]
    fn talent_bio_requires_a_profile() {
        assert!(talent_bio(&json!({}), &user()).is_none());
    }

    #[test]
    fn client_about_us_requires_a_name() {
        let nameless = json!({"profile": {"company": {"industry": "fintech"}}});
        assert!(client_about_us(&nameless).is_none());

        let named = json!({
            "profile": {
                "company": {"name": "Acme", "industry": "fintech"},
                "stats": {"jobs_posted_count": 7, "total_spend": 12000}
            }
        });
        let prompt = client_about_us(&named).unwrap();
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("fintech"));
        assert!(prompt.contains("$12000+"));
    }

    #[test]
    fn job_description_requires_a_title() {
        assert!(job_description(&json!({"job": {}})).is_none());

        let data = json!({
            "job": {
                "title": "Build a billing service",
                "required_skills": ["rust", "postgres"],
                "estimated_duration": "3 months"
            }
        });
        let prompt = job_description(&data).unwrap();
        assert!(prompt.contains("Build a billing service"));
        assert!(prompt.contains("rust, postgres"));
        assert!(prompt.contains("3 months"));
    }

    #[test]
    fn cover_letter_prefers_third_party_company_name() {
        let data = json!({
            "talent": {"rating": 4.2, "badge": "star"},
            "job": {
                "title": "API integration",
                "client": {"name": "Fallback Inc"},
                "third_party_metadata": {"company_name": "Acme GmbH"},
                "required_skills": ["rust"]
            },
            "metadata": {"tone": "friendly", "length": "short"}
        });

        let prompt = proposal_cover_letter(&data, &user()).unwrap();
        assert!(prompt.contains("Acme GmbH"));
        assert!(!prompt.contains("Fallback Inc"));
        assert!(prompt.contains("Top-Rated Star"));
        assert!(prompt.contains("warm, approachable"));
        assert!(prompt.contains("120-180 words"));
    }

    #[test]
    fn cover_letter_requires_talent_and_job() {
        assert!(proposal_cover_letter(&json!({"job": {"title": "x"}}), &user()).is_none());
        assert!(proposal_cover_letter(&json!({"talent": {}}), &user()).is_none());
    }

    #[test]
    fn categorization_prompt_truncates_the_description() {
        let long = "x".repeat(600);
        let slugs = vec!["web-development".to_string(), "design".to_string()];
        let prompt = job_categorization(&long, &slugs);

        assert!(prompt.contains(&"x".repeat(350)));
        assert!(!prompt.contains(&"x".repeat(351)));
        assert!(prompt.contains("web-development"));
        assert!(prompt.contains("\"other\""));
    }
}
