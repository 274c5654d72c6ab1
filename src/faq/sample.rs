use super::types::Faq;

const SAMPLE: [(&str, &str); 14] = [
    (
        "How do I reset my password?",
        "To reset your password, click 'Forgot Password' on the login page and follow the instructions sent to your email.",
    ),
    (
        "Can I change my account's email?",
        "Yes, you can change your email from your account settings under 'Profile Information'.",
    ),
    (
        "How do I cancel my subscription?",
        "To cancel your subscription, go to 'Billing' in your account settings and select 'Cancel Subscription'.",
    ),
    (
        "What payment methods do you accept?",
        "We accept Visa, MasterCard, American Express, and PayPal.",
    ),
    (
        "Where can I find my invoices?",
        "Invoices are available in your account dashboard under 'Billing History'.",
    ),
    (
        "Is there a free trial?",
        "Yes, we offer a 14-day free trial for all new users.",
    ),
    (
        "How do I export my data from the app?",
        "Go to 'Settings' > 'Data Export' and click 'Export Data' to download your information.",
    ),
    (
        "The application is running very slow, what should I do?",
        "Try clearing your browser cache or restarting the app. If the issue persists, contact support.",
    ),
    (
        "I am getting an error, can you help?",
        "Please provide the error message to our support team for assistance.",
    ),
    (
        "Which web browsers are supported?",
        "We support the latest versions of Chrome, Firefox, Safari, and Edge.",
    ),
    (
        "How can I contact a human support agent?",
        "You can contact a human agent via live chat or by emailing support@example.com.",
    ),
    (
        "What are your support hours?",
        "Our support team is available Monday to Friday, 9 AM to 6 PM.",
    ),
    (
        "What is your privacy policy?",
        "You can read our privacy policy at example.com/privacy.",
    ),
    (
        "Tell me about the latest update.",
        "The latest update includes performance improvements and new features. See our blog for details.",
    ),
];

/// The built-in support corpus used when no FAQ file is configured.
pub fn sample_faqs() -> Vec<Faq> {
    SAMPLE
        .iter()
        .map(|(question, answer)| Faq::new(*question, *answer))
        .collect()
}
