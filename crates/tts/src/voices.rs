use serde::Serialize;

/// Voice used when a request names none
pub const DEFAULT_VOICE: &str = "rachel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// Catalog entry shown by the voice picker
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: Gender,
    pub accent: &'static str,
    pub description: &'static str,
}

const fn voice(
    id: &'static str,
    name: &'static str,
    gender: Gender,
    description: &'static str,
) -> Voice {
    Voice {
        id,
        name,
        gender,
        accent: "American",
        description,
    }
}

/// Voices the provider is known to accept
pub static VOICES: [Voice; 9] = [
    voice("rachel", "Rachel", Gender::Female, "Warm, professional voice perfect for narrations"),
    voice("domi", "Domi", Gender::Female, "Strong, confident voice with clear articulation"),
    voice("bella", "Bella", Gender::Female, "Soft, gentle voice ideal for storytelling"),
    voice("antoni", "Antoni", Gender::Male, "Deep, authoritative voice for professional content"),
    voice("elli", "Elli", Gender::Female, "Young, energetic voice with natural flow"),
    voice("josh", "Josh", Gender::Male, "Friendly, conversational voice for casual content"),
    voice("arnold", "Arnold", Gender::Male, "Mature, distinguished voice for formal presentations"),
    voice("adam", "Adam", Gender::Male, "Clear, reliable voice for educational content"),
    voice("sam", "Sam", Gender::Male, "Versatile voice suitable for various content types"),
];

pub fn supported_voice_ids() -> Vec<&'static str> {
    VOICES.iter().map(|v| v.id).collect()
}

pub fn find(id: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == id)
}
