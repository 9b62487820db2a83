//! Template library and the word lists placeholders are drawn from.

pub(crate) const SUCCESS_STORIES: &[&str] = &[
    "🚀 {customer_name} generated ${revenue}K in {timeframe} days using {product_name}! The {key_feature} was a game-changer. Who's ready to replicate this success? #Success #AI",
    "📊 CASE STUDY: {business_type} owner went from ${start_revenue}K to ${end_revenue}K monthly using our {solution_type}. The secret? {winning_strategy}. #BusinessGrowth",
    "💡 Client Update: {customer_name}'s {metric_type} increased by {percentage}% after implementing {feature_name}. This is why we built OMNI Empire! #Results",
];

pub(crate) const EDUCATIONAL_CONTENT: &[&str] = &[
    "🎯 {industry} TIP: {insight_text} This single change helped {customer_count}+ entrepreneurs increase revenue by {avg_increase}%. Try it today! #BusinessTips",
    "📈 Data Insight: {percentage}% of successful businesses automate {process_name}. Meanwhile, {competitor_stat}. Which side are you on? #Automation",
    "⚡ Quick Win: Implement {strategy_name} and see results in {timeframe} hours. {social_proof_stat} of our clients report immediate improvement. #QuickWin",
];

pub(crate) const URGENCY_DRIVEN: &[&str] = &[
    "🔥 FLASH INSIGHT: Only {percentage}% of businesses are using {technology_name} effectively. Early adopters are seeing {benefit_metric}. Don't get left behind! #Innovation",
    "⏰ Market Alert: {trend_description} is changing everything. Companies adapting now are gaining {competitive_advantage}. Ready to lead? #MarketTrend",
    "🚨 Opportunity Window: {market_condition} creates perfect conditions for {business_strategy}. Act fast - window closes {urgency_timeframe}! #Opportunity",
];

pub(crate) const EMAIL_WELCOME: &[&str] = &[
    "You've made an excellent decision joining {customer_count}+ entrepreneurs who are transforming their businesses with {key_benefit}. Here's what happens next...",
    "Ready for immediate results? {percentage}% of our customers see results within {timeframe} hours using this simple strategy...",
];

pub(crate) const FACEBOOK_ADS: &[&str] = &[
    "Tired of {pain_point}? {customer_count}+ entrepreneurs use {solution_name} to generate ${avg_revenue}+ monthly. Join them: {cta_text}",
    "{attention_grabber} {social_proof_stat} report {specific_result} in just {timeframe} days. Ready to join them? {cta_text}",
];

pub(crate) const DEFAULT_TEMPLATE: &str = "Default content template";
pub(crate) const DEFAULT_TEMPLATES: &[&str] = &[DEFAULT_TEMPLATE];

pub(crate) const TOP_KEYWORDS: &[&str] = &[
    "AI automation",
    "revenue generation",
    "business empire",
    "passive income",
];

pub(crate) const EMOTIONAL_TRIGGERS: &[&str] =
    &["urgency", "social_proof", "exclusivity", "transformation"];

/// Literal fragments that signal social proof in a template.
pub(crate) const SOCIAL_PROOF_MARKERS: &[&str] = &["+ entrepreneurs", "% success", "generated $"];

pub(crate) const POSTING_TIMES: &[&str] = &["09:00", "13:00", "17:00"];

pub(crate) const TRENDING_TOPICS: &[&str] = &["AI automation surge", "Remote business growth"];

pub(crate) const BASE_HASHTAGS: &[&str] = &[
    "#Entrepreneur",
    "#AI",
    "#BusinessGrowth",
    "#PassiveIncome",
    "#Automation",
];

pub(crate) const PERFORMANCE_RECOMMENDATIONS: &[&str] = &[
    "Increase posting frequency during peak hours",
    "Add more social proof elements",
    "Test different call-to-action phrases",
];

/// Placeholder name and the values it is drawn from.
pub(crate) const WORD_LISTS: &[(&str, &[&str])] = &[
    ("customer_name", &["Sarah M.", "Mike R.", "Jennifer K.", "David L.", "Alex Chen", "Maria S."]),
    ("revenue", &["5", "8", "12", "15", "25", "35", "50"]),
    ("timeframe", &["7", "14", "21", "30", "45", "60"]),
    ("product_name", &["OMNI Bot Premium", "AI Revenue Accelerator", "Marshall Empire"]),
    ("key_feature", &["automation engine", "AI optimization", "revenue tracking", "lead generation"]),
    ("business_type", &["Marketing Agency", "E-commerce Store", "Consulting Firm", "Tech Startup", "Real Estate Business"]),
    ("start_revenue", &["2", "5", "8", "10"]),
    ("end_revenue", &["15", "25", "35", "50"]),
    ("solution_type", &["AI automation system", "revenue optimization platform", "business empire toolkit"]),
    ("winning_strategy", &["complete automation", "AI-powered optimization", "systematic scaling"]),
    ("metric_type", &["conversion rate", "revenue", "lead generation", "customer acquisition"]),
    ("percentage", &["127", "156", "189", "234", "278", "312", "387"]),
    ("feature_name", &["automated funnel system", "AI revenue optimizer", "smart lead magnet"]),
    ("customer_count", &["847", "1247", "1567", "2134", "2789"]),
    ("avg_increase", &["127", "156", "189", "234", "278"]),
    ("insight_text", &[
        "Automate your lead generation first, then scale",
        "Focus on conversion optimization before traffic",
        "AI beats manual processes 9 times out of 10",
    ]),
    ("process_name", &["lead generation", "customer onboarding", "sales follow-up", "content creation"]),
    ("competitor_stat", &[
        "their competitors are struggling with manual processes",
        "traditional methods are becoming obsolete",
        "manual systems can't compete with AI efficiency",
    ]),
    ("strategy_name", &["AI lead magnets", "automated follow-up", "smart retargeting", "conversion optimization"]),
    ("social_proof_stat", &["87%", "92%", "94%", "96%"]),
    ("technology_name", &["AI automation", "smart funnels", "predictive analytics", "automated optimization"]),
    ("benefit_metric", &["300% faster growth", "5x better ROI", "2x higher conversions", "10x efficiency gains"]),
    ("trend_description", &[
        "AI automation adoption",
        "Remote business acceleration",
        "Automated revenue generation",
        "Smart business optimization",
    ]),
    ("competitive_advantage", &["first-mover advantage", "market leadership", "customer loyalty", "revenue dominance"]),
    ("market_condition", &[
        "Economic uncertainty",
        "Digital transformation acceleration",
        "AI adoption surge",
        "Remote work normalization",
    ]),
    ("business_strategy", &[
        "automated revenue systems",
        "AI-powered optimization",
        "passive income generation",
        "systematic business scaling",
    ]),
    ("urgency_timeframe", &["this quarter", "next month", "by year-end", "in 60 days"]),
    ("key_benefit", &["AI-powered automation", "predictable recurring revenue", "done-for-you funnels"]),
    ("pain_point", &["manual follow-ups", "inconsistent sales", "wasted ad spend"]),
    ("solution_name", &["OMNI Empire", "OMNI Bot Premium", "AI Revenue Accelerator"]),
    ("avg_revenue", &["5,000", "8,500", "12,000"]),
    ("cta_text", &["Start today", "Get instant access", "Claim your spot"]),
    ("attention_grabber", &["Stop guessing.", "Still doing it by hand?", "Here's the shortcut:"]),
    ("specific_result", &["doubled revenue", "their first $10K month", "3x more leads"]),
];
