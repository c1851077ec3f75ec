//! Message catalogs and locale-prefixed routing.
//!
//! Every page exists once per [`Locale`] under `/{locale}/...`. UI strings come
//! from the static catalogs below; content strings (captions, trip titles)
//! come from `trips.json` through [`LocalizedText`](crate::types::LocalizedText).
//!
//! Lookups never fail: a key missing from the Slovak catalog falls back to
//! English, and a key missing everywhere renders as the key itself, which makes
//! gaps visible on the page without breaking the build.

use crate::types::Locale;
use std::collections::HashMap;
use std::sync::LazyLock;

const EN: &[(&str, &str)] = &[
    // navigation
    ("nav.home", "Home"),
    ("nav.gallery", "Gallery"),
    ("nav.about", "About"),
    ("nav.contact", "Contact"),
    ("nav.language", "Language"),
    ("nav.menu", "Menu"),
    ("language.en", "English"),
    ("language.sk", "Slovenčina"),
    // metadata
    ("metadata.title", "Travel Photography Portfolio"),
    ("metadata.title_template", "{page} | {site}"),
    (
        "metadata.description",
        "Travel photography from mountains, cities and wild places around the world.",
    ),
    // home
    ("home.hero.title", "Capturing the World"),
    ("home.hero.title_highlight", "One Journey at a Time"),
    (
        "home.hero.description",
        "Landscapes, cultures and quiet moments collected on the road. Browse the gallery or get in touch about prints.",
    ),
    ("home.hero.browse_gallery", "Browse Gallery"),
    ("home.hero.about_me", "About Me"),
    ("home.featured.title", "Featured Photos"),
    ("home.featured.description", "A selection from recent travels"),
    ("home.featured.view_all", "View all photos"),
    ("home.cta.title", "Interested in a Print?"),
    (
        "home.cta.description",
        "Every photo is available as a high-resolution file or a fine art print. Send me a message and I will get back to you.",
    ),
    ("home.cta.get_in_touch", "Get in Touch"),
    // gallery
    ("gallery.title", "Gallery"),
    ("gallery.description", "Explore photos from all my travels"),
    ("gallery.all", "All"),
    ("gallery.country", "Country"),
    ("gallery.region", "Region"),
    ("gallery.category", "Category"),
    ("gallery.sort_by", "Sort by"),
    ("gallery.sort.date", "Newest first"),
    ("gallery.sort.country", "Country"),
    ("gallery.show_all_filters", "Show all filters"),
    ("gallery.clear_filters", "Clear filters"),
    ("gallery.no_photos", "No photos match the selected filters."),
    ("gallery.photos.one", "{count} photo"),
    ("gallery.photos.other", "{count} photos"),
    ("gallery.photos_filtered.one", "{count} photo (filtered)"),
    ("gallery.photos_filtered.other", "{count} photos (filtered)"),
    // categories
    ("categories.mountains", "Mountains"),
    ("categories.city", "City"),
    ("categories.animals", "Animals"),
    ("categories.nature", "Nature"),
    ("categories.landscape", "Landscape"),
    ("categories.culture", "Culture"),
    // lightbox
    ("lightbox.close", "Close"),
    ("lightbox.previous", "Previous photo"),
    ("lightbox.next", "Next photo"),
    ("lightbox.request_full_res", "Request full resolution"),
    ("lightbox.counter", "{current} / {total}"),
    // about
    ("about.title", "About"),
    ("about.greeting", "Hi, I'm the photographer behind these pictures"),
    (
        "about.professional.intro",
        "I am a travel photographer focused on mountains, wild landscapes and the people who live among them.",
    ),
    (
        "about.professional.experience",
        "For more than ten years I have been carrying a camera on every trip, from the High Tatras to the Andes.",
    ),
    ("about.professional.what_i_do_title", "What I do"),
    ("about.professional.what_i_do_1", "Landscape and travel photography"),
    ("about.professional.what_i_do_2", "Fine art prints in limited editions"),
    ("about.professional.what_i_do_3", "Licensing for editorial and commercial use"),
    ("about.professional.approach_title", "My approach"),
    (
        "about.professional.approach",
        "Natural light, patience and as little post-processing as the scene allows.",
    ),
    ("about.professional.languages_title", "Languages"),
    ("about.professional.languages", "English, Slovak"),
    ("about.know_me_better", "Get to know me better"),
    (
        "about.personal.hobbies",
        "When I am not behind the camera I hike, climb and plan the next trip.",
    ),
    ("about.personal.home", "Home is a small town under the mountains."),
    (
        "about.personal.prints",
        "Most of my prints are made by a local lab I have worked with for years.",
    ),
    ("about.contact.title", "Get in Touch"),
    (
        "about.contact.description",
        "Questions, collaborations or just a hello. I read every message.",
    ),
    // contact
    ("contact.title", "Contact"),
    (
        "contact.description",
        "Interested in a print, licensing or a collaboration? Send me a message.",
    ),
    ("contact.email", "Email"),
    ("contact.email_desc", "I usually answer within a day"),
    ("contact.photo_purchases", "Photo purchases"),
    ("contact.photo_purchases_desc", "Prints and digital licenses"),
    ("contact.response_time", "Response time"),
    ("contact.response_time_desc", "24 to 48 hours"),
    (
        "contact.purchase_info",
        "Mention the photo reference and I will send you the available sizes and prices.",
    ),
    ("contact.form.name", "Name"),
    ("contact.form.email", "Email"),
    ("contact.form.subject", "Subject"),
    ("contact.form.subject_placeholder", "What is this about?"),
    ("contact.form.photo_reference", "Photo reference"),
    ("contact.form.photo_reference_placeholder", "e.g. mountain-sunset.jpg"),
    (
        "contact.form.photo_reference_prefilled",
        "Filled in from the photo you were viewing.",
    ),
    ("contact.form.message", "Message"),
    ("contact.form.message_placeholder", "Your message..."),
    ("contact.form.required", "*"),
    ("contact.form.send", "Send message"),
    ("contact.form.sending", "Sending..."),
    ("contact.success.title", "Message sent!"),
    (
        "contact.success.description",
        "Thank you for reaching out. I will get back to you soon.",
    ),
    ("contact.success.send_another", "Send another message"),
    // footer
    (
        "footer.tagline",
        "Travel photography from around the world. Prints and licenses available.",
    ),
    ("footer.quick_links", "Quick links"),
    ("footer.about_me", "About me"),
    ("footer.connect", "Connect"),
    ("footer.copyright", "© {year} {author}. All rights reserved."),
    // errors
    ("errors.not_found.title", "Page not found"),
    (
        "errors.not_found.description",
        "The page you are looking for does not exist or was moved.",
    ),
    ("errors.not_found.home", "Back to home"),
    ("errors.contact.required", "Name, email, and message are required"),
    ("errors.contact.invalid_email", "Invalid email address"),
    ("errors.contact.failed", "Failed to process request"),
    ("redirect.text", "Redirecting..."),
];

const SK: &[(&str, &str)] = &[
    // navigation
    ("nav.home", "Domov"),
    ("nav.gallery", "Galéria"),
    ("nav.about", "O mne"),
    ("nav.contact", "Kontakt"),
    ("nav.language", "Jazyk"),
    ("nav.menu", "Ponuka"),
    // metadata
    ("metadata.title", "Cestovateľská fotografia"),
    (
        "metadata.description",
        "Cestovateľské fotografie z hôr, miest a divokých miest z celého sveta.",
    ),
    // home
    ("home.hero.title", "Zachytávam svet"),
    ("home.hero.title_highlight", "cestu za cestou"),
    (
        "home.hero.description",
        "Krajiny, kultúry a tiché chvíle zozbierané na cestách. Pozrite si galériu alebo sa ozvite kvôli výtlačkom.",
    ),
    ("home.hero.browse_gallery", "Prezrieť galériu"),
    ("home.hero.about_me", "O mne"),
    ("home.featured.title", "Vybrané fotografie"),
    ("home.featured.description", "Výber z posledných ciest"),
    ("home.featured.view_all", "Zobraziť všetky fotografie"),
    ("home.cta.title", "Máte záujem o výtlačok?"),
    (
        "home.cta.description",
        "Každá fotografia je dostupná v plnom rozlíšení alebo ako umelecký výtlačok. Napíšte mi a ozvem sa vám.",
    ),
    ("home.cta.get_in_touch", "Kontaktujte ma"),
    // gallery
    ("gallery.title", "Galéria"),
    ("gallery.description", "Preskúmajte fotografie zo všetkých mojich ciest"),
    ("gallery.all", "Všetky"),
    ("gallery.country", "Krajina"),
    ("gallery.region", "Región"),
    ("gallery.category", "Kategória"),
    ("gallery.sort_by", "Zoradiť podľa"),
    ("gallery.sort.date", "Najnovšie"),
    ("gallery.sort.country", "Krajiny"),
    ("gallery.show_all_filters", "Zobraziť všetky filtre"),
    ("gallery.clear_filters", "Zrušiť filtre"),
    ("gallery.no_photos", "Zvoleným filtrom nezodpovedajú žiadne fotografie."),
    ("gallery.photos.one", "{count} fotografia"),
    ("gallery.photos.few", "{count} fotografie"),
    ("gallery.photos.other", "{count} fotografií"),
    ("gallery.photos_filtered.one", "{count} fotografia (filtrované)"),
    ("gallery.photos_filtered.few", "{count} fotografie (filtrované)"),
    ("gallery.photos_filtered.other", "{count} fotografií (filtrované)"),
    // categories
    ("categories.mountains", "Hory"),
    ("categories.city", "Mesto"),
    ("categories.animals", "Zvieratá"),
    ("categories.nature", "Príroda"),
    ("categories.landscape", "Krajina"),
    ("categories.culture", "Kultúra"),
    // lightbox
    ("lightbox.close", "Zavrieť"),
    ("lightbox.previous", "Predchádzajúca fotografia"),
    ("lightbox.next", "Ďalšia fotografia"),
    ("lightbox.request_full_res", "Vyžiadať plné rozlíšenie"),
    // about
    ("about.title", "O mne"),
    ("about.greeting", "Ahoj, som fotograf, ktorý stojí za týmito zábermi"),
    (
        "about.professional.intro",
        "Som cestovateľský fotograf so zameraním na hory, divokú krajinu a ľudí, ktorí v nej žijú.",
    ),
    (
        "about.professional.experience",
        "Už viac ako desať rokov nosím fotoaparát na každú cestu, od Vysokých Tatier po Andy.",
    ),
    ("about.professional.what_i_do_title", "Čomu sa venujem"),
    ("about.professional.what_i_do_1", "Krajinárska a cestovateľská fotografia"),
    ("about.professional.what_i_do_2", "Umelecké výtlačky v limitovaných edíciách"),
    ("about.professional.what_i_do_3", "Licencie na redakčné a komerčné použitie"),
    ("about.professional.approach_title", "Môj prístup"),
    (
        "about.professional.approach",
        "Prirodzené svetlo, trpezlivosť a len toľko úprav, koľko scéna znesie.",
    ),
    ("about.professional.languages_title", "Jazyky"),
    ("about.professional.languages", "slovenčina, angličtina"),
    ("about.know_me_better", "Spoznajte ma lepšie"),
    (
        "about.personal.hobbies",
        "Keď práve nefotím, chodím po horách, lezem a plánujem ďalšiu cestu.",
    ),
    ("about.personal.home", "Domov je pre mňa malé mestečko pod horami."),
    (
        "about.personal.prints",
        "Väčšinu výtlačkov pripravuje miestne laboratórium, s ktorým spolupracujem roky.",
    ),
    ("about.contact.title", "Napíšte mi"),
    (
        "about.contact.description",
        "Otázky, spolupráca alebo len pozdrav. Čítam každú správu.",
    ),
    // contact
    ("contact.title", "Kontakt"),
    (
        "contact.description",
        "Máte záujem o výtlačok, licenciu alebo spoluprácu? Pošlite mi správu.",
    ),
    ("contact.email", "E-mail"),
    ("contact.email_desc", "Zvyčajne odpovedám do jedného dňa"),
    ("contact.photo_purchases", "Nákup fotografií"),
    ("contact.photo_purchases_desc", "Výtlačky a digitálne licencie"),
    ("contact.response_time", "Čas odpovede"),
    ("contact.response_time_desc", "24 až 48 hodín"),
    (
        "contact.purchase_info",
        "Uveďte označenie fotografie a pošlem vám dostupné rozmery a ceny.",
    ),
    ("contact.form.name", "Meno"),
    ("contact.form.email", "E-mail"),
    ("contact.form.subject", "Predmet"),
    ("contact.form.subject_placeholder", "O čo ide?"),
    ("contact.form.photo_reference", "Označenie fotografie"),
    ("contact.form.photo_reference_placeholder", "napr. mountain-sunset.jpg"),
    (
        "contact.form.photo_reference_prefilled",
        "Vyplnené podľa fotografie, ktorú ste si prezerali.",
    ),
    ("contact.form.message", "Správa"),
    ("contact.form.message_placeholder", "Vaša správa..."),
    ("contact.form.send", "Odoslať správu"),
    ("contact.form.sending", "Odosiela sa..."),
    ("contact.success.title", "Správa odoslaná!"),
    (
        "contact.success.description",
        "Ďakujem za správu. Čoskoro sa vám ozvem.",
    ),
    ("contact.success.send_another", "Poslať ďalšiu správu"),
    // footer
    (
        "footer.tagline",
        "Cestovateľská fotografia z celého sveta. Výtlačky a licencie na požiadanie.",
    ),
    ("footer.quick_links", "Rýchle odkazy"),
    ("footer.about_me", "O mne"),
    ("footer.connect", "Kontakt"),
    ("footer.copyright", "© {year} {author}. Všetky práva vyhradené."),
    // errors
    ("errors.not_found.title", "Stránka sa nenašla"),
    (
        "errors.not_found.description",
        "Stránka, ktorú hľadáte, neexistuje alebo bola presunutá.",
    ),
    ("errors.not_found.home", "Späť na úvod"),
    ("errors.contact.required", "Meno, e-mail a správa sú povinné"),
    ("errors.contact.invalid_email", "Neplatná e-mailová adresa"),
    ("errors.contact.failed", "Požiadavku sa nepodarilo spracovať"),
    ("redirect.text", "Presmerúvam..."),
];

static CATALOGS: LazyLock<HashMap<Locale, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        HashMap::from([
            (Locale::En, EN.iter().copied().collect()),
            (Locale::Sk, SK.iter().copied().collect()),
        ])
    });

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    CATALOGS.get(&locale).and_then(|c| c.get(key)).copied()
}

/// Translate `key`, falling back to English and then to the key itself.
pub fn t<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(locale, key)
        .or_else(|| lookup(Locale::En, key))
        .unwrap_or(key)
}

/// Translate `key` and substitute `{name}` placeholders.
pub fn t_with(locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
    interpolate(t(locale, key), args)
}

/// Plural-aware lookup of `{key}.{one|few|other}` with `{count}` substituted.
pub fn t_count(locale: Locale, key: &str, count: usize) -> String {
    let form = format!("{key}.{}", plural_form(locale, count));
    let template = lookup(locale, &form)
        .or_else(|| lookup(locale, &format!("{key}.other")))
        .or_else(|| lookup(Locale::En, &format!("{key}.{}", plural_form(Locale::En, count))))
        .unwrap_or(key);
    interpolate(template, &[("count", &count.to_string())])
}

/// CLDR plural category for cardinal numbers.
pub fn plural_form(locale: Locale, count: usize) -> &'static str {
    match (locale, count) {
        (_, 1) => "one",
        (Locale::Sk, 2..=4) => "few",
        _ => "other",
    }
}

fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

// ============================================================================
// Routing
// ============================================================================

/// `/gallery/` → `/{locale}/gallery/`.
pub fn localized_path(locale: Locale, path: &str) -> String {
    let path = path.trim_start_matches('/');
    format!("/{}/{}", locale.as_str(), path)
}

/// Split a leading locale segment off a URL path.
///
/// `/sk/gallery/` → `(Some(Sk), "/gallery/")`, `/photos/a.jpg` → `(None, "/photos/a.jpg")`.
pub fn strip_locale(path: &str) -> (Option<Locale>, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, "/"),
    };
    match Locale::ALL.into_iter().find(|l| l.as_str() == first) {
        Some(locale) => (Some(locale), rest),
        None => (None, path),
    }
}

/// The same page in another locale.
pub fn switch_locale(path: &str, to: Locale) -> String {
    let (_, rest) = strip_locale(path);
    localized_path(to, rest)
}

/// Pick the best supported locale from an `Accept-Language` header.
///
/// Entries are ranked by q-value (default 1.0); ties keep header order.
/// `q=0` entries are refused. Falls back to English.
pub fn negotiate(accept_language: Option<&str>) -> Locale {
    let Some(header) = accept_language else {
        return Locale::default();
    };

    let mut best: Option<(f32, Locale)> = None;
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or("").trim();
        let q = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        if q <= 0.0 {
            continue;
        }
        let Some(locale) = Locale::parse(tag) else {
            continue;
        };
        if best.is_none_or(|(best_q, _)| q > best_q) {
            best = Some((q, locale));
        }
    }
    best.map(|(_, l)| l).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_per_locale() {
        assert_eq!(t(Locale::En, "nav.gallery"), "Gallery");
        assert_eq!(t(Locale::Sk, "nav.gallery"), "Galéria");
    }

    #[test]
    fn missing_sk_key_falls_back_to_english() {
        assert_eq!(t(Locale::Sk, "lightbox.counter"), "{current} / {total}");
        assert_eq!(t(Locale::Sk, "language.en"), "English");
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(t(Locale::Sk, "no.such.key"), "no.such.key");
    }

    #[test]
    fn every_sk_key_exists_in_english() {
        let en: HashMap<&str, &str> = EN.iter().copied().collect();
        // Plural forms English does not have
        for (key, _) in SK.iter().filter(|(k, _)| !k.ends_with(".few")) {
            assert!(en.contains_key(key), "sk key '{key}' missing in en");
        }
    }

    #[test]
    fn every_category_has_a_label() {
        for category in crate::types::Category::ALL {
            for locale in Locale::ALL {
                let key = format!("categories.{}", category.as_str());
                assert_ne!(t(locale, &key), key);
            }
        }
    }

    #[test]
    fn interpolation() {
        assert_eq!(
            t_with(
                Locale::En,
                "footer.copyright",
                &[("year", "2025"), ("author", "Jana")]
            ),
            "© 2025 Jana. All rights reserved."
        );
        assert_eq!(
            t_with(Locale::Sk, "lightbox.counter", &[("current", "3"), ("total", "12")]),
            "3 / 12"
        );
    }

    #[test]
    fn english_plurals() {
        assert_eq!(t_count(Locale::En, "gallery.photos", 1), "1 photo");
        assert_eq!(t_count(Locale::En, "gallery.photos", 0), "0 photos");
        assert_eq!(t_count(Locale::En, "gallery.photos", 3), "3 photos");
    }

    #[test]
    fn slovak_plurals() {
        assert_eq!(t_count(Locale::Sk, "gallery.photos", 1), "1 fotografia");
        assert_eq!(t_count(Locale::Sk, "gallery.photos", 3), "3 fotografie");
        assert_eq!(t_count(Locale::Sk, "gallery.photos", 5), "5 fotografií");
        assert_eq!(t_count(Locale::Sk, "gallery.photos", 0), "0 fotografií");
        assert_eq!(
            t_count(Locale::Sk, "gallery.photos_filtered", 2),
            "2 fotografie (filtrované)"
        );
    }

    #[test]
    fn localized_paths() {
        assert_eq!(localized_path(Locale::En, "/"), "/en/");
        assert_eq!(localized_path(Locale::Sk, "/gallery/"), "/sk/gallery/");
        assert_eq!(localized_path(Locale::Sk, "about/"), "/sk/about/");
    }

    #[test]
    fn strip_locale_prefix() {
        assert_eq!(strip_locale("/sk/gallery/"), (Some(Locale::Sk), "/gallery/"));
        assert_eq!(strip_locale("/en"), (Some(Locale::En), "/"));
        assert_eq!(strip_locale("/en/"), (Some(Locale::En), "/"));
        assert_eq!(strip_locale("/photos/a.jpg"), (None, "/photos/a.jpg"));
        assert_eq!(strip_locale("/english/"), (None, "/english/"));
    }

    #[test]
    fn switch_keeps_page() {
        assert_eq!(
            switch_locale("/en/gallery/country-peru/", Locale::Sk),
            "/sk/gallery/country-peru/"
        );
        assert_eq!(switch_locale("/sk/", Locale::En), "/en/");
    }

    #[test]
    fn negotiate_by_quality() {
        assert_eq!(negotiate(Some("sk-SK,sk;q=0.9,en;q=0.8")), Locale::Sk);
        assert_eq!(negotiate(Some("en-US,en;q=0.9,sk;q=0.8")), Locale::En);
        assert_eq!(negotiate(Some("de-DE,sk;q=0.5,en;q=0.7")), Locale::En);
        assert_eq!(negotiate(Some("de, fr;q=0.8")), Locale::En);
        assert_eq!(negotiate(Some("en;q=0, sk;q=0.1")), Locale::Sk);
        assert_eq!(negotiate(None), Locale::En);
    }
}
