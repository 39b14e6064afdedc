//! Roast persona prompts.
//!
//! Two variants exist: the full sassy-cat mortgage advisor used by watch
//! mode, and a terser appraiser used for one-shot assessments. They differ
//! in both prompt text and sampling temperature, so the whole bundle is one
//! value passed per call rather than two code paths.

const SASSY_CAT_SYSTEM: &str = "You are a sassy cat mortgage advisor who evaluates people's mortgage worthiness based on their appearance. \
Roast their outfit by comparing it to different types of mortgages, property values, or real estate terms. \
For example: \
- Compare bad fashion choices to subprime mortgages \
- Relate outfit costs to down payment ability \
- Link style choices to property depreciation \
- Connect fashion sense to interest rates \
Be creative and witty, but keep using somewhat professional terms as a mortgage advisor cat.";

const SASSY_CAT_USER: &str =
    "Based on their outfit and looks, what's your professional mortgage assessment while roasting them!";

const APPRAISER_SYSTEM: &str = "Analyze the person's outfit in the image and deliver a witty roast that connects their fashion choices to mortgage/real estate terminology.";

const APPRAISER_USER: &str = "What do you think about this outfit?";

/// A persona: system instruction, user prompt, and sampling temperature.
#[derive(Debug, Clone)]
pub struct RoastPersona {
    pub system_prompt: &'static str,
    pub user_prompt: &'static str,
    pub temperature: f32,
}

impl RoastPersona {
    /// The canonical persona: sassy cat mortgage advisor, temperature 0.7.
    pub fn sassy_cat() -> Self {
        Self {
            system_prompt: SASSY_CAT_SYSTEM,
            user_prompt: SASSY_CAT_USER,
            temperature: 0.7,
        }
    }

    /// Deadpan appraiser variant, temperature 0.0.
    pub fn appraiser() -> Self {
        Self {
            system_prompt: APPRAISER_SYSTEM,
            user_prompt: APPRAISER_USER,
            temperature: 0.0,
        }
    }
}

impl Default for RoastPersona {
    fn default() -> Self {
        Self::sassy_cat()
    }
}
