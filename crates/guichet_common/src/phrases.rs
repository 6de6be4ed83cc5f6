//! Keyword lists and fixed French reply strings.
//!
//! Classification is substring containment against these lists, tried in the
//! order the dialogue engine declares. No tokenization, no stemming, no
//! negation handling; the first matching list wins.

/// Outage reports ("panne") — highest classification priority.
pub const OUTAGE_KEYWORDS: &[&str] = &["panne", "coupure", "blackout"];

/// Billing questions.
pub const BILL_KEYWORDS: &[&str] = &["facture", "invoice", "payer"];

/// Medical emergencies.
pub const EMERGENCY_KEYWORDS: &[&str] = &["urgence", "médical", "hôpital", "clinique"];

/// Greetings — reply with the menu, no stage change.
pub const GREETING_KEYWORDS: &[&str] = &["bonjour", "salut", "hello"];

/// Farewells — thank the user and drop any session.
pub const FAREWELL_KEYWORDS: &[&str] = &["merci", "bye", "au revoir"];

pub const GREETING: &str = "👋 Bonjour ! Je suis votre assistant. Je peux vous aider avec : \
     pannes, factures, urgences. Dites-moi comment vous aider !";

pub const FAREWELL: &str = "Merci de votre visite. À bientôt ! 👋";

pub const FALLBACK: &str =
    "Je n'ai pas compris votre demande. Dites 'panne', 'facture' ou 'urgence' pour commencer.";

pub const ASK_LOCATION: &str =
    "Je note votre panne. Dans quel quartier ou commune êtes-vous situé ?";

pub const ASK_BILL_DETAIL: &str = "Je peux vous aider avec votre facture. Quel est le problème : \
     montant, consommation, délai de paiement ou erreur de facturation ?";

pub const ASK_EMERGENCY_LOCATION: &str = "🚨 Urgence médicale bien reçue. Indiquez le nom et \
     l'adresse de l'hôpital ou de la clinique concernée.";

pub const RETRY_LOCATION: &str =
    "Je n'ai pas saisi la localisation. Indiquez votre quartier ou commune, s'il vous plaît.";

pub const RETRY_EMERGENCY_LOCATION: &str =
    "Précisez le nom complet et l'adresse de l'établissement, s'il vous plaît.";

/// Bill sub-topics, tried in declared order; the first key contained in the
/// (lower-cased) message selects its explanation.
pub const BILL_TOPICS: &[(&str, &str)] = &[
    (
        "montant",
        "Le montant de votre facture dépend de votre consommation relevée. \
         Vous pouvez contester le montant en agence avec votre numéro d'abonné.",
    ),
    (
        "consommation",
        "Votre consommation est relevée chaque mois sur votre compteur. \
         Un agent peut vérifier le compteur si la consommation vous semble anormale.",
    ),
    (
        "délai",
        "Le délai de paiement est de 15 jours après émission de la facture. \
         Passé ce délai, une pénalité peut s'appliquer.",
    ),
    (
        "erreur",
        "Pour une erreur de facturation, présentez la facture concernée en agence ; \
         une correction sera émise sous 72 heures.",
    ),
];

pub const BILL_FALLBACK: &str = "Je n'ai pas identifié votre problème de facture. \
     Précisez : montant, consommation, délai ou erreur.";

pub fn outage_created(ticket_id: u64, location: &str) -> String {
    format!(
        "✅ Ticket #{ticket_id} créé pour votre panne à {location}. \
         Une équipe technique sera dépêchée dans les plus brefs délais."
    )
}

pub fn emergency_created(ticket_id: u64, location: &str) -> String {
    format!(
        "🚨 Urgence médicale enregistrée (ticket #{ticket_id}) pour {location}. \
         L'intervention est traitée en priorité absolue."
    )
}
