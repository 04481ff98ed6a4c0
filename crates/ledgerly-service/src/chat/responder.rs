//! Topic guard and the built-in bookkeeping responder.
//!
//! The assistant only answers bookkeeping, tax, and small-business
//! finance questions. Replies are assembled locally from a set of
//! guidance templates keyed on the question's subject.

/// Keywords that mark a message as in-domain.
const ALLOWED_TOPICS: &[&str] = &[
    "bookkeep",
    "accounting",
    "accountant",
    "ledger",
    "journal",
    "reconcile",
    "reconciliation",
    "balance",
    "transaction",
    "expense",
    "cost",
    "spend",
    "payment",
    "invoice",
    "receipt",
    "bill",
    "revenue",
    "income",
    "profit",
    "loss",
    "margin",
    "tax",
    "deduct",
    "irs",
    "1099",
    "w2",
    "filing",
    "quarterly",
    "payroll",
    "salary",
    "wage",
    "employee",
    "contractor",
    "cash flow",
    "budget",
    "forecast",
    "financial",
    "fiscal",
    "audit",
    "asset",
    "liability",
    "equity",
    "depreciation",
    "business",
    "llc",
    "corporation",
    "s-corp",
    "sole proprietor",
    "partnership",
    "quickbooks",
    "xero",
    "freshbooks",
    "spreadsheet",
    "chart of accounts",
    "categorize",
    "bank",
    "statement",
    "p&l",
    "profit and loss",
    "balance sheet",
    "trial balance",
];

/// Keywords that mark a message as clearly out of domain.
const BLOCKED_TOPICS: &[&str] = &[
    "movie",
    "music",
    "game",
    "sport",
    "recipe",
    "cooking",
    "travel",
    "vacation",
    "weather",
    "dating",
    "medical",
    "programming",
    "javascript",
    "python",
    "homework",
    "essay",
    "poem",
    "physics",
    "chemistry",
];

/// Whether the responder should engage with this message.
pub fn is_on_topic(message: &str) -> bool {
    let lower = message.to_lowercase();
    let trimmed = lower.trim();

    if is_greeting(trimmed) || is_service_question(trimmed) {
        return true;
    }

    let allowed = ALLOWED_TOPICS.iter().any(|t| lower.contains(t));
    let blocked = BLOCKED_TOPICS.iter().any(|t| lower.contains(t));

    if blocked && !allowed {
        return false;
    }
    // Short phrases without any finance vocabulary get the benefit of
    // the doubt; longer ones must name a finance topic.
    allowed || trimmed.split_whitespace().count() <= 4
}

fn is_greeting(message: &str) -> bool {
    let stripped = message.trim_end_matches(['!', '.', ',', '?', ' ']);
    matches!(
        stripped,
        "hi" | "hello"
            | "hey"
            | "good morning"
            | "good afternoon"
            | "good evening"
            | "thanks"
            | "thank you"
            | "bye"
            | "goodbye"
    )
}

fn is_service_question(message: &str) -> bool {
    message.contains("what can you help")
        || message.contains("what do you do")
        || message.contains("how can you help")
        || message.contains("what services")
}

/// Reply used when the guard rejects a message.
pub fn off_topic_reply() -> String {
    "I focus exclusively on bookkeeping, accounting, taxes, and small-business \
     finances, so I can't help with that one. Ask me about tracking expenses, \
     tax deductions, cash flow, payroll, or your accounting software and I'm \
     all yours."
        .to_string()
}

/// Assemble a reply for an in-domain message.
pub fn reply_to(message: &str) -> String {
    let lower = message.to_lowercase();

    if is_greeting(lower.trim()) {
        return "Hello! I'm your bookkeeping assistant. I can help you track \
                expenses, find tax deductions, understand your financial \
                reports, and keep your books in order. What's your biggest \
                money question right now?"
            .to_string();
    }
    if is_service_question(&lower) {
        return "I specialize in accounting, bookkeeping, and financial \
                management for small businesses: expense categorization, \
                bank reconciliation, tax deductions and quarterly planning, \
                P&L and balance sheet analysis, cash flow forecasting, \
                payroll basics, and help with tools like QuickBooks or Xero. \
                Ask away!"
            .to_string();
    }
    if lower.contains("tax") || lower.contains("deduct") || lower.contains("irs") {
        return "Good tax hygiene starts with clean records. Keep every \
                business receipt, separate business and personal spending, \
                and set aside roughly 25-30% of profit for taxes. Common \
                deductions small businesses miss: home office, mileage, \
                software subscriptions, and professional services. If you \
                pay contractors over $600 a year, plan for 1099 filings. \
                For anything borderline, note the business purpose on the \
                receipt the day you spend it."
            .to_string();
    }
    if lower.contains("cash flow") || lower.contains("forecast") || lower.contains("budget") {
        return "Think of cash flow as timing, not profit: you can be \
                profitable on paper and still miss payroll. Build a simple \
                13-week view: list expected money in and money out week by \
                week, update it every Monday, and watch for weeks that dip \
                near zero. Invoice promptly, chase receivables past 30 days, \
                and keep at least one month of operating costs as a buffer."
            .to_string();
    }
    if lower.contains("expense") || lower.contains("cost") || lower.contains("spend")
        || lower.contains("categorize")
    {
        return "Start with a small chart of accounts: a dozen categories \
                beats a hundred. Record expenses weekly while the context is \
                fresh, attach the receipt, and note the business purpose. \
                Keep business and personal money in separate accounts so \
                categorization is mechanical rather than archaeology at \
                year end."
            .to_string();
    }
    if lower.contains("llc") || lower.contains("s-corp") || lower.contains("corporation")
        || lower.contains("sole proprietor")
    {
        return "Business structure is a tax and liability decision. A sole \
                proprietorship is simplest but offers no liability shield. \
                An LLC protects personal assets with light paperwork. An \
                S-Corp election can reduce self-employment tax once profits \
                comfortably exceed a reasonable salary, at the cost of \
                payroll admin. Many businesses start as an LLC and elect \
                S-Corp status later; a CPA can time that switch for you."
            .to_string();
    }
    if lower.contains("reconcile") || lower.contains("reconciliation") || lower.contains("bank") {
        return "Reconciliation means matching your books against the bank \
                statement line by line. Do it monthly: tick off matching \
                transactions, investigate anything unmatched (usually timing, \
                duplicates, or missed entries), and don't carry differences \
                forward. A clean monthly reconciliation is the single best \
                early-warning system your books have."
            .to_string();
    }
    if lower.contains("payroll") || lower.contains("employee") || lower.contains("salary")
        || lower.contains("wage")
    {
        return "Payroll is one place not to improvise: misclassifying \
                employees as contractors or missing withholding deposits \
                gets expensive fast. Use a payroll service to handle \
                withholding, filings, and year-end forms, keep timesheets \
                and pay records for at least four years, and revisit \
                contractor-versus-employee classification whenever a role \
                changes."
            .to_string();
    }

    // In-domain, but no specific template matched.
    "Happy to help with that. To give you useful guidance I'd start with \
     your records: what does your bookkeeping currently capture for this, \
     and over what period? Share a bit more detail (amounts, dates, what \
     kind of business) and I'll walk you through it step by step."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finance_questions_pass_guard() {
        assert!(is_on_topic("How do I categorize a software expense?"));
        assert!(is_on_topic("What tax deductions can my LLC claim?"));
        assert!(is_on_topic("hello"));
        assert!(is_on_topic("What can you help with?"));
    }

    #[test]
    fn test_off_topic_is_rejected() {
        assert!(!is_on_topic(
            "Can you recommend a good movie for the weekend with friends?"
        ));
        assert!(!is_on_topic(
            "Write me a python homework essay about chemistry please now"
        ));
    }

    #[test]
    fn test_mixed_message_passes() {
        // Blocked keyword but a finance topic too.
        assert!(is_on_topic(
            "How do I deduct travel expenses for a business trip?"
        ));
    }

    #[test]
    fn test_replies_match_subject() {
        assert!(reply_to("How should I plan for quarterly taxes?").contains("deduction"));
        assert!(reply_to("My cash flow is tight").contains("13-week"));
        assert!(reply_to("hi").contains("bookkeeping assistant"));
    }
}
