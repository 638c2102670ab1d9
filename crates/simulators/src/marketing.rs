//! Marketing studio: captions, offers and hashtags for a product in a
//! chosen brand voice.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::table::CannedTable;
use crate::SimulatorError;

pub const DEFAULT_TONE: &str = "professional";
pub const DEFAULT_PLATFORM: &str = "instagram";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

const PRODUCT: &str = "{product}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandTone {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const BRAND_TONES: [BrandTone; 5] = [
    BrandTone { key: "professional", label: "Professional", description: "Formal, trustworthy, expert" },
    BrandTone { key: "friendly", label: "Friendly", description: "Warm, approachable, conversational" },
    BrandTone { key: "playful", label: "Playful", description: "Fun, energetic, youthful" },
    BrandTone { key: "bold", label: "Bold", description: "Confident, daring, impactful" },
    BrandTone { key: "minimal", label: "Minimal", description: "Clean, simple, straightforward" },
];

/// Key/label pair for the audience and platform pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub key: &'static str,
    pub label: &'static str,
}

pub const TARGET_AUDIENCES: [Choice; 6] = [
    Choice { key: "young_professionals", label: "Young Professionals (25-35)" },
    Choice { key: "families", label: "Families with Kids" },
    Choice { key: "health_conscious", label: "Health-Conscious Consumers" },
    Choice { key: "budget_shoppers", label: "Budget-Conscious Shoppers" },
    Choice { key: "premium_buyers", label: "Premium/Luxury Buyers" },
    Choice { key: "small_business", label: "Small Business Owners" },
];

pub const PLATFORMS: [Choice; 5] = [
    Choice { key: "instagram", label: "Instagram" },
    Choice { key: "facebook", label: "Facebook" },
    Choice { key: "twitter", label: "Twitter/X" },
    Choice { key: "linkedin", label: "LinkedIn" },
    Choice { key: "whatsapp", label: "WhatsApp Status" },
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentRequest {
    pub brand_tone: String,
    pub target_audience: String,
    pub platform: String,
    pub product_name: String,
    pub product_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub captions: Vec<String>,
    pub offers: Vec<String>,
    pub hashtags: Vec<String>,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent, SimulatorError>;
}

#[derive(Debug, Clone, Copy)]
struct ToneTemplates {
    captions: [&'static str; 3],
    offers: [&'static str; 3],
    hashtags: [&'static str; 5],
}

impl ToneTemplates {
    fn render(&self, product_name: &str) -> GeneratedContent {
        GeneratedContent {
            captions: self
                .captions
                .iter()
                .map(|c| c.replace(PRODUCT, product_name))
                .collect(),
            offers: self.offers.iter().map(|o| o.to_string()).collect(),
            hashtags: self.hashtags.iter().map(|h| h.to_string()).collect(),
        }
    }
}

/// Template-table generator with an artificial delay.
#[derive(Debug, Clone)]
pub struct CannedContentGenerator {
    table: CannedTable<ToneTemplates>,
    delay: Duration,
}

impl Default for CannedContentGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl CannedContentGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            table: tone_table(),
            delay,
        }
    }
}

#[async_trait]
impl ContentGenerator for CannedContentGenerator {
    async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent, SimulatorError> {
        let product_name = request.product_name.trim();
        if request.brand_tone.trim().is_empty()
            || request.target_audience.trim().is_empty()
            || product_name.is_empty()
        {
            return Err(SimulatorError::MissingInput(
                "Please fill in brand tone, target audience, and product name.".to_string(),
            ));
        }

        tokio::time::sleep(self.delay).await;
        Ok(self.table.resolve(request.brand_tone.trim()).render(product_name))
    }
}

fn tone_table() -> CannedTable<ToneTemplates> {
    CannedTable::new(
        (
            DEFAULT_TONE,
            ToneTemplates {
                captions: [
                    "Introducing {product} – crafted for those who demand excellence. Quality you can trust, results you can see. 🎯",
                    "{product}: Where innovation meets reliability. Elevate your standards today. ✨",
                    "We're proud to present {product}. Built with precision, delivered with care. Your success is our priority.",
                ],
                offers: [
                    "Limited Time: Get 15% off on bulk orders (min. 10 units)",
                    "Free premium packaging on orders above ₹2,000",
                    "Early bird discount: First 50 customers get exclusive pricing",
                ],
                hashtags: ["#QualityFirst", "#PremiumProducts", "#BusinessExcellence", "#TrustedBrand", "#MadeInIndia"],
            },
        ),
        [
            (
                "friendly",
                ToneTemplates {
                    captions: [
                        "Hey there! 👋 Meet {product} – your new favorite! Made with love, just for you. 💕",
                        "Good things come to those who try {product}! Trust us, you're gonna love this one. 😊",
                        "We're so excited to share {product} with you! It's everything you've been looking for and more! 🎉",
                    ],
                    offers: [
                        "🎁 Share with a friend and both of you get 20% off!",
                        "Happy Hour Sale! Order in the next 2 hours for a surprise gift 🎊",
                        "Join our family! First order? Here's ₹200 off on us! 💝",
                    ],
                    hashtags: ["#LoveThis", "#HappyCustomers", "#ShareTheJoy", "#NewFavorite", "#GoodVibesOnly"],
                },
            ),
            (
                "playful",
                ToneTemplates {
                    captions: [
                        "POV: You just discovered {product} and your life will never be the same 🚀✨",
                        "{product} just dropped and it's giving everything! No cap, this one's a vibe 🔥",
                        "When {product} enters the chat 👀💯 IYKYK",
                    ],
                    offers: [
                        "🎮 Spin the wheel for a chance to win up to 40% off!",
                        "Tag your bestie & both win mystery discounts! 🎲",
                        "Flash sale alert! ⚡ 50% off for the next 60 mins only!",
                    ],
                    hashtags: ["#Trending", "#MustHave", "#GameChanger", "#ViralProduct", "#TreatYourself"],
                },
            ),
            (
                "bold",
                ToneTemplates {
                    captions: [
                        "{product}. No compromises. No excuses. Just results. 💪",
                        "The future is here. {product} is changing the game. Are you in or out? 🔥",
                        "{product}: For those who refuse to settle for ordinary. Be extraordinary. ⚡",
                    ],
                    offers: [
                        "MASSIVE SALE: 30% off – Today only. Don't miss it.",
                        "VIP Access: Unlock exclusive pricing. Limited spots.",
                        "Act now or regret later. Best prices won't last.",
                    ],
                    hashtags: ["#NoLimits", "#GameChanger", "#BeTheBest", "#PowerMove", "#Unstoppable"],
                },
            ),
            (
                "minimal",
                ToneTemplates {
                    captions: [
                        "{product}. Simple. Effective. Yours.",
                        "Less noise. More quality. {product}.",
                        "{product} – because sometimes, simple is better.",
                    ],
                    offers: [
                        "Clean deal: 10% off. No strings attached.",
                        "Free delivery. Always.",
                        "Subscribe & save 15% every month.",
                    ],
                    hashtags: ["#SimpleLife", "#LessIsMore", "#Quality", "#Minimalist", "#Essential"],
                },
            ),
        ],
    )
}
