//! Prompts Module
//!
//! The fixed system preamble sent with every outbound completion, and
//! the named prompt templates for the generation endpoint.

pub mod templates;

use std::str::FromStr;

use crate::api::ChatMessage;
use crate::upstream::AuthUser;

/// Named prompt template for the generation endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    None,
    TalentBio,
    ClientAboutUs,
    JobDescription,
    ProposalCoverLetter,
}

impl FromStr for TemplateName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TemplateName::None),
            "talent_bio" => Ok(TemplateName::TalentBio),
            "client_about_us" => Ok(TemplateName::ClientAboutUs),
            "job_description" => Ok(TemplateName::JobDescription),
            "proposal_cover_letter" => Ok(TemplateName::ProposalCoverLetter),
            _ => Err(()),
        }
    }
}

impl TemplateName {
    /// Build the prompt for this template from request data.
    ///
    /// `None` means the template cannot produce a prompt, either because
    /// it is the null template or because required data is missing.
    pub fn build(&self, data: &serde_json::Value, user: &AuthUser) -> Option<String> {
        match self {
            TemplateName::None => None,
            TemplateName::TalentBio => templates::talent_bio(data, user),
            TemplateName::ClientAboutUs => templates::client_about_us(data),
            TemplateName::JobDescription => templates::job_description(data),
            TemplateName::ProposalCoverLetter => templates::proposal_cover_letter(data, user),
        }
    }
}

/// The system preamble prepended to every outbound message list
pub fn preamble() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("Welcome to the talent marketplace platform!"),
        ChatMessage::system(
            "\
You are an expert assistant embedded in a premium talent marketplace that \
connects freelancers with clients.

Your role is to help both talents and clients communicate clearly, \
professionally and persuasively in order to win more work and build \
lasting relationships.

Core principles you never break:
- Always write natural, human-sounding text that feels personal and authentic.
- Prioritize clarity, brevity and impact.
- Never use generic filler, corporate jargon or overused buzzwords unless the user explicitly requests them.
- Never reveal you are an AI or that the text was generated.
- Never add explanations, markdown formatting or extra commentary unless specifically asked.
- Strictly respect any length limits (count spaces).
- When writing for talents: first person, confident but never arrogant.
- When writing for clients and companies: third person, credible and professional.
- Output only the final text the user needs, nothing else.",
        ),
    ]
}
