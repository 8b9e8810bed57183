//! Canonical form for submitted email addresses.
//!
//! Mirrors the usual normalize-email defaults: the whole address is
//! lowercased and provider-specific aliases are folded so that
//! `John.Doe+portfolio@GoogleMail.com` and `johndoe@gmail.com` compare equal.

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];

const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.at", "hotmail.be", "hotmail.ca", "hotmail.co.uk", "hotmail.com",
    "hotmail.com.au", "hotmail.com.br", "hotmail.de", "hotmail.es", "hotmail.fr",
    "hotmail.it", "live.be", "live.co.uk", "live.com", "live.de", "live.fr",
    "live.it", "live.nl", "msn.com", "outlook.at", "outlook.be", "outlook.com",
    "outlook.com.au", "outlook.com.br", "outlook.de", "outlook.es", "outlook.fr",
    "outlook.in", "outlook.it", "outlook.jp", "passport.com",
];

const YAHOO_DOMAINS: &[&str] = &[
    "rocketmail.com", "yahoo.ca", "yahoo.co.uk", "yahoo.com", "yahoo.de",
    "yahoo.fr", "yahoo.in", "yahoo.it", "ymail.com",
];

const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com"];

const YANDEX_DOMAINS: &[&str] = &[
    "yandex.ru", "yandex.ua", "yandex.kz", "yandex.com", "yandex.by", "ya.ru",
];

/// Normalizes an already validated address. Input without an `@` is only lowercased.
pub fn normalize_email(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let Some((local, domain)) = lowered.rsplit_once('@') else {
        return lowered;
    };

    let (local, domain) = if GMAIL_DOMAINS.contains(&domain) {
        let stripped = strip_subaddress(local, '+').replace('.', "");
        (keep_if_empty(stripped, local), "gmail.com")
    } else if OUTLOOK_DOMAINS.contains(&domain) || ICLOUD_DOMAINS.contains(&domain) {
        (keep_if_empty(strip_subaddress(local, '+'), local), domain)
    } else if YAHOO_DOMAINS.contains(&domain) {
        (keep_if_empty(strip_last_segment(local, '-'), local), domain)
    } else if YANDEX_DOMAINS.contains(&domain) {
        (local.to_string(), "yandex.ru")
    } else {
        (local.to_string(), domain)
    };

    format!("{local}@{domain}")
}

fn strip_subaddress(local: &str, separator: char) -> String {
    local.split(separator).next().unwrap_or_default().to_string()
}

fn strip_last_segment(local: &str, separator: char) -> String {
    match local.rsplit_once(separator) {
        Some((head, _)) => head.to_string(),
        None => local.to_string(),
    }
}

fn keep_if_empty(stripped: String, original: &str) -> String {
    if stripped.is_empty() {
        original.to_string()
    } else {
        stripped
    }
}
