use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::error::ItemError;

/// Cut styles offered at the counter. Serialized with the shop's own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cut {
    #[serde(rename = "Bife")]
    Steak,
    #[serde(rename = "Bife fino")]
    ThinSteak,
    #[serde(rename = "Bife grosso")]
    ThickSteak,
    #[serde(rename = "Grelha")]
    Grill,
    #[serde(rename = "Iscas")]
    Strips,
    #[serde(rename = "Cubos")]
    Cubes,
    #[serde(rename = "Feijoada")]
    Feijoada,
    #[serde(rename = "Inteiro")]
    Whole,
    #[serde(rename = "Peça")]
    Piece,
    #[serde(rename = "Medalhão")]
    Medallion,
    #[serde(rename = "Moído X vezes", alias = "ground N times")]
    Ground,
    #[serde(rename = "Para panela")]
    Stew,
    #[serde(rename = "Para picadinho")]
    Diced,
    #[serde(rename = "Para strogonoff")]
    Stroganoff,
    #[serde(rename = "Para espeto")]
    Skewer,
    #[serde(rename = "NAO IMPORTA", alias = "doesn't matter")]
    NoPreference,
}

impl Cut {
    pub const ALL: [Self; 16] = [
        Self::Steak,
        Self::ThinSteak,
        Self::ThickSteak,
        Self::Grill,
        Self::Strips,
        Self::Cubes,
        Self::Feijoada,
        Self::Whole,
        Self::Piece,
        Self::Medallion,
        Self::Ground,
        Self::Stew,
        Self::Diced,
        Self::Stroganoff,
        Self::Skewer,
        Self::NoPreference,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steak => "Bife",
            Self::ThinSteak => "Bife fino",
            Self::ThickSteak => "Bife grosso",
            Self::Grill => "Grelha",
            Self::Strips => "Iscas",
            Self::Cubes => "Cubos",
            Self::Feijoada => "Feijoada",
            Self::Whole => "Inteiro",
            Self::Piece => "Peça",
            Self::Medallion => "Medalhão",
            Self::Ground => "Moído X vezes",
            Self::Stew => "Para panela",
            Self::Diced => "Para picadinho",
            Self::Stroganoff => "Para strogonoff",
            Self::Skewer => "Para espeto",
            Self::NoPreference => "NAO IMPORTA",
        }
    }

    pub const fn requires_grind_count(self) -> bool {
        matches!(self, Self::Ground)
    }
}

impl Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Cut {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ground N times" => Ok(Self::Ground),
            "doesn't matter" => Ok(Self::NoPreference),
            label => Self::ALL
                .into_iter()
                .find(|cut| cut.as_str() == label)
                .ok_or_else(|| ItemError::UnknownCut(s.to_string())),
        }
    }
}

/// Whether the customer wants the meat seasoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seasoning {
    #[serde(rename = "yes", alias = "Sim")]
    Yes,
    #[serde(rename = "no", alias = "Não")]
    No,
    #[serde(rename = "doesn't matter", alias = "Não Importa")]
    NoPreference,
}

impl Seasoning {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::NoPreference => "doesn't matter",
        }
    }
}

impl Display for Seasoning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Seasoning {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "yes" | "Sim" => Ok(Self::Yes),
            "no" | "Não" => Ok(Self::No),
            "doesn't matter" | "Não Importa" => Ok(Self::NoPreference),
            _ => Err(ItemError::UnknownSeasoning(s.to_string())),
        }
    }
}

/// How many times ground meat goes through the grinder (1 to 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct GrindCount(u8);

impl GrindCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for GrindCount {
    type Error = ItemError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|count| (Self::MIN..=Self::MAX).contains(count))
            .map(Self)
            .ok_or(ItemError::GrindCountOutOfRange(value))
    }
}

impl From<GrindCount> for i64 {
    fn from(count: GrindCount) -> Self {
        Self::from(count.0)
    }
}

impl Display for GrindCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of an order. Only constructed through [`Item::new`] or by
/// decoding rows the store wrote itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    description: String,
    cut: Cut,
    seasoning: Seasoning,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grind_count: Option<GrindCount>,
}

impl Item {
    pub fn new(
        description: &str,
        cut: Cut,
        seasoning: Seasoning,
        grind_count: Option<GrindCount>,
    ) -> Result<Self, ItemError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ItemError::MissingDescription);
        }

        let grind_count = if cut.requires_grind_count() {
            Some(grind_count.ok_or(ItemError::MissingGrindCount)?)
        } else {
            None
        };

        Ok(Self {
            description: description.to_string(),
            cut,
            seasoning,
            grind_count,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn cut(&self) -> Cut {
        self.cut
    }

    pub const fn seasoning(&self) -> Seasoning {
        self.seasoning
    }

    pub const fn grind_count(&self) -> Option<GrindCount> {
        self.grind_count
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.description, self.cut)?;
        if let Some(count) = self.grind_count {
            write!(f, " ({count}x)")?;
        }
        write!(f, " | seasoning: {}", self.seasoning)
    }
}

/// Grind count as it arrives from the intake form: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrindCountInput {
    Number(i64),
    Text(String),
}

/// Unvalidated item as submitted by the operator or production screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "corte")]
    pub cut: Option<String>,
    #[serde(default, alias = "temperar")]
    pub seasoning: Option<String>,
    #[serde(default, alias = "moido")]
    pub grind_count: Option<GrindCountInput>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl TryFrom<ItemDraft> for Item {
    type Error = ItemError;

    fn try_from(draft: ItemDraft) -> Result<Self, Self::Error> {
        let description =
            non_blank(draft.description.as_deref()).ok_or(ItemError::MissingDescription)?;
        let cut: Cut = non_blank(draft.cut.as_deref())
            .ok_or(ItemError::MissingCut)?
            .parse()?;
        let seasoning: Seasoning = non_blank(draft.seasoning.as_deref())
            .ok_or(ItemError::MissingSeasoning)?
            .parse()?;

        let grind_count = if cut.requires_grind_count() {
            let count = match draft.grind_count {
                Some(GrindCountInput::Number(n)) => n,
                Some(GrindCountInput::Text(text)) => match non_blank(Some(text.as_str())) {
                    Some(trimmed) => trimmed
                        .parse()
                        .map_err(|_| ItemError::InvalidGrindCount(text.clone()))?,
                    None => return Err(ItemError::MissingGrindCount),
                },
                None => return Err(ItemError::MissingGrindCount),
            };
            Some(GrindCount::try_from(count)?)
        } else {
            None
        };

        Self::new(description, cut, seasoning, grind_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(description: &str, cut: &str, seasoning: &str) -> ItemDraft {
        ItemDraft {
            description: Some(description.to_string()),
            cut: Some(cut.to_string()),
            seasoning: Some(seasoning.to_string()),
            grind_count: None,
        }
    }

    #[test]
    fn test_cut_labels_round_trip_through_from_str() {
        for cut in Cut::ALL {
            assert_eq!(cut.as_str().parse::<Cut>().unwrap(), cut);
        }
        assert_eq!("ground N times".parse::<Cut>().unwrap(), Cut::Ground);
        assert_eq!("doesn't matter".parse::<Cut>().unwrap(), Cut::NoPreference);
        assert_eq!(
            "Picanha".parse::<Cut>().unwrap_err(),
            ItemError::UnknownCut("Picanha".to_string())
        );
    }

    #[test]
    fn test_seasoning_accepts_shop_labels() {
        assert_eq!("Sim".parse::<Seasoning>().unwrap(), Seasoning::Yes);
        assert_eq!("Não".parse::<Seasoning>().unwrap(), Seasoning::No);
        assert_eq!(
            "Não Importa".parse::<Seasoning>().unwrap(),
            Seasoning::NoPreference
        );
        assert!("maybe".parse::<Seasoning>().is_err());
    }

    #[test]
    fn test_grind_count_bounds() {
        assert_eq!(GrindCount::try_from(1_i64).unwrap().get(), 1);
        assert_eq!(GrindCount::try_from(10_i64).unwrap().get(), 10);
        assert_eq!(
            GrindCount::try_from(0_i64).unwrap_err(),
            ItemError::GrindCountOutOfRange(0)
        );
        assert_eq!(
            GrindCount::try_from(11_i64).unwrap_err(),
            ItemError::GrindCountOutOfRange(11)
        );
        assert_eq!(
            GrindCount::try_from(-3_i64).unwrap_err(),
            ItemError::GrindCountOutOfRange(-3)
        );
    }

    #[test]
    fn test_draft_to_item_trims_description() {
        let item = Item::try_from(draft("  500g  ", "Bife", "yes")).unwrap();
        assert_eq!(item.description(), "500g");
        assert_eq!(item.cut(), Cut::Steak);
        assert_eq!(item.seasoning(), Seasoning::Yes);
        assert_eq!(item.grind_count(), None);
    }

    #[test]
    fn test_draft_missing_fields() {
        let mut missing_description = draft("", "Bife", "yes");
        missing_description.description = Some("   ".to_string());
        assert_eq!(
            Item::try_from(missing_description).unwrap_err(),
            ItemError::MissingDescription
        );

        let mut missing_cut = draft("1kg", "Bife", "yes");
        missing_cut.cut = None;
        assert_eq!(Item::try_from(missing_cut).unwrap_err(), ItemError::MissingCut);

        let mut missing_seasoning = draft("1kg", "Bife", "yes");
        missing_seasoning.seasoning = Some(String::new());
        assert_eq!(
            Item::try_from(missing_seasoning).unwrap_err(),
            ItemError::MissingSeasoning
        );
    }

    #[test]
    fn test_ground_cut_requires_grind_count() {
        let no_count = draft("1kg patinho", "Moído X vezes", "no");
        assert_eq!(
            Item::try_from(no_count).unwrap_err(),
            ItemError::MissingGrindCount
        );

        let mut blank_count = draft("1kg patinho", "Moído X vezes", "no");
        blank_count.grind_count = Some(GrindCountInput::Text(String::new()));
        assert_eq!(
            Item::try_from(blank_count).unwrap_err(),
            ItemError::MissingGrindCount
        );

        let mut text_count = draft("1kg patinho", "Moído X vezes", "no");
        text_count.grind_count = Some(GrindCountInput::Text("2".to_string()));
        let item = Item::try_from(text_count).unwrap();
        assert_eq!(item.grind_count().map(GrindCount::get), Some(2));

        let mut garbage = draft("1kg patinho", "Moído X vezes", "no");
        garbage.grind_count = Some(GrindCountInput::Text("twice".to_string()));
        assert_eq!(
            Item::try_from(garbage).unwrap_err(),
            ItemError::InvalidGrindCount("twice".to_string())
        );
    }

    #[test]
    fn test_grind_count_dropped_for_other_cuts() {
        let mut with_count = draft("1kg", "Cubos", "yes");
        with_count.grind_count = Some(GrindCountInput::Number(3));
        let item = Item::try_from(with_count).unwrap();
        assert_eq!(item.grind_count(), None);
    }

    #[test]
    fn test_draft_accepts_shop_field_names() {
        let draft: ItemDraft = serde_json::from_value(json!({
            "descricao": "1kg alcatra",
            "corte": "Moído X vezes",
            "temperar": "Não Importa",
            "moido": "3"
        }))
        .unwrap();

        let item = Item::try_from(draft).unwrap();
        assert_eq!(item.description(), "1kg alcatra");
        assert_eq!(item.cut(), Cut::Ground);
        assert_eq!(item.seasoning(), Seasoning::NoPreference);
        assert_eq!(item.grind_count().map(GrindCount::get), Some(3));
    }

    #[test]
    fn test_stored_item_json_shape() {
        let item = Item::new(
            "2kg",
            Cut::Ground,
            Seasoning::No,
            Some(GrindCount::try_from(2_i64).unwrap()),
        )
        .unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "description": "2kg",
                "cut": "Moído X vezes",
                "seasoning": "no",
                "grindCount": 2
            })
        );

        let steak = Item::new("500g", Cut::Steak, Seasoning::Yes, None).unwrap();
        assert_eq!(
            serde_json::to_value(&steak).unwrap(),
            json!({"description": "500g", "cut": "Bife", "seasoning": "yes"})
        );
    }

    #[test]
    fn test_item_display() {
        let ground = Item::new(
            "1kg patinho",
            Cut::Ground,
            Seasoning::NoPreference,
            Some(GrindCount::try_from(2_i64).unwrap()),
        )
        .unwrap();
        assert_eq!(
            ground.to_string(),
            "1kg patinho | Moído X vezes (2x) | seasoning: doesn't matter"
        );
    }
}
