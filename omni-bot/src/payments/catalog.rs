//! Products sold through the checkout pages. Prices are whole US dollars.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    pub result: &'static str,
    pub quote: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Product {
    /// URL slug, e.g. `omni-bot-premium`.
    pub slug: &'static str,
    pub name: &'static str,
    pub price_usd: u32,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub cta: &'static str,
    pub benefits: &'static [&'static str],
    pub urgency: &'static str,
    pub guarantee: &'static str,
    pub testimonials: &'static [Testimonial],
}

impl Product {
    pub fn price_cents(&self) -> u64 {
        u64::from(self.price_usd) * 100
    }
}

pub const PRODUCTS: &[Product] = &[
    Product {
        slug: "omni-bot-premium",
        name: "OMNI Bot Premium",
        price_usd: 297,
        description: "Complete AI business automation that generates revenue 24/7",
        features: &[
            "24/7 AI Assistant",
            "Revenue Analytics",
            "Customer Management",
            "Automated Marketing",
        ],
        cta: "Start Earning Today",
        benefits: &[
            "Generate $5,000+ monthly recurring revenue",
            "Automate customer acquisition and retention",
            "AI-powered analytics for optimization",
            "Complete setup in under 30 minutes",
        ],
        urgency: "Limited Time: 50% Off for Next 24 Hours",
        guarantee: "30-Day Money-Back Guarantee",
        testimonials: &[
            Testimonial {
                name: "Sarah Chen",
                result: "$12,000 in first month",
                quote: "OMNI Bot completely transformed my business operations.",
            },
            Testimonial {
                name: "Marcus Rodriguez",
                result: "300% revenue increase",
                quote: "Best investment I ever made for my business.",
            },
        ],
    },
    Product {
        slug: "marshall-empire",
        name: "Marshall Empire Access",
        price_usd: 997,
        description: "Complete business empire building platform with 18 integrated systems",
        features: &[
            "18 Business Modules",
            "AI Strategy Coach",
            "Legal Protection",
            "Scaling Systems",
        ],
        cta: "Build Your Empire",
        benefits: &[
            "Launch multiple revenue streams simultaneously",
            "AI-guided business strategy and optimization",
            "Legal protection and asset management",
            "Scale from startup to 7-figure enterprise",
        ],
        urgency: "Exclusive: Only 100 Spots Available This Month",
        guarantee: "60-Day Success Guarantee",
        testimonials: &[
            Testimonial {
                name: "Jennifer Walsh",
                result: "$50,000 monthly revenue",
                quote: "Marshall Empire gave me the complete roadmap to success.",
            },
            Testimonial {
                name: "David Kim",
                result: "5 businesses launched",
                quote: "The integrated approach is incredibly powerful.",
            },
        ],
    },
    Product {
        slug: "ai-revenue-accelerator",
        name: "AI Revenue Accelerator",
        price_usd: 497,
        description: "Instant revenue generation system powered by advanced AI",
        features: &[
            "Automated Sales Funnels",
            "Lead Generation",
            "Payment Processing",
            "Analytics Dashboard",
        ],
        cta: "Generate Revenue Now",
        benefits: &[
            "Start generating revenue within 48 hours",
            "Automated sales funnel optimization",
            "AI-powered lead generation and conversion",
            "Real-time performance analytics",
        ],
        urgency: "Flash Sale: 60% Off Ends in 6 Hours",
        guarantee: "14-Day Fast Results Guarantee",
        testimonials: &[
            Testimonial {
                name: "Alex Thompson",
                result: "$8,000 in first week",
                quote: "Fastest ROI I have ever experienced.",
            },
            Testimonial {
                name: "Lisa Martinez",
                result: "400% conversion increase",
                quote: "The AI optimization is incredible.",
            },
        ],
    },
];

pub fn find_product(slug: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices() {
        assert_eq!(find_product("omni-bot-premium").unwrap().price_usd, 297);
        assert_eq!(find_product("marshall-empire").unwrap().price_cents(), 99_700);
        assert_eq!(find_product("ai-revenue-accelerator").unwrap().price_usd, 497);
        assert!(find_product("crypto-moonshot").is_none());
    }
}
