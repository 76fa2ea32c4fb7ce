use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of labels a table column draws from.
pub trait Category: Copy + Eq + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
    /// Column name used in error messages.
    const COLUMN: &'static str;

    /// Label written to CSV.
    fn label(&self) -> &'static str;

    fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.label() == value)
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $column:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];
            const COLUMN: &'static str = $column;

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::from_label(value).ok_or_else(|| {
                    Error::InvalidDataset(format!(
                        "unknown {} '{}'",
                        <Self as Category>::COLUMN,
                        value
                    ))
                })
            }
        }
    };
}

category! {
    /// Police squad owning an incident.
    Squad, "squad" {
        Homicide => "homicide",
        Narcotics => "narcotics",
        Cybercrime => "cybercrime",
        Fraud => "fraud",
        Burglary => "burglary",
        OrganizedCrime => "organized crime",
    }
}

category! {
    /// City location an incident is filed under.
    IncidentLocation, "location" {
        AuroraTheater => "Aurora Theater",
        DowntownPark => "Downtown Park",
        RiversideMall => "Riverside Mall",
        CentralStation => "Central Station",
        EastsideAlley => "Eastside Alley",
        WestEndClub => "West End Club",
    }
}

category! {
    IncidentType, "type" {
        Theft => "theft",
        Assault => "assault",
        Vandalism => "vandalism",
        Fraud => "fraud",
        Murder => "murder",
        DrugOffense => "drug offense",
    }
}

category! {
    /// Badge-controlled area inside the theater.
    TheaterArea, "location" {
        MainStage => "main stage",
        Backstage => "backstage",
        LightingGrid => "lighting grid",
        PropRoom => "prop room",
        DressingRoom => "dressing room",
        SoundBooth => "sound booth",
        OrchestraPit => "orchestra pit",
    }
}

category! {
    Direction, "direction" {
        Entering => "entering",
        Leaving => "leaving",
    }
}

category! {
    /// Job held by a member of staff.
    ///
    /// `LeadActor` is reserved for the victim and is never drawn at random;
    /// see [`StaffRole::ASSIGNABLE`].
    StaffRole, "employee_role" {
        StageManager => "Stage Manager",
        LightingTechnician => "Lighting Technician",
        SoundEngineer => "Sound Engineer",
        SetDesigner => "Set Designer",
        CostumeDesigner => "Costume Designer",
        Actor => "Actor",
        Director => "Director",
        PropsMaster => "Props Master",
        MakeupArtist => "Makeup Artist",
        Usher => "Usher",
        BoxOfficeClerk => "Box Office Clerk",
        ProductionAssistant => "Production Assistant",
        Choreographer => "Choreographer",
        Dramaturg => "Dramaturg",
        FrontOfHouseManager => "Front of House Manager",
        LeadActor => "Lead Actor",
    }
}

impl StaffRole {
    /// Roles handed out to bystanders.
    pub const ASSIGNABLE: &'static [StaffRole] = &[
        StaffRole::StageManager,
        StaffRole::LightingTechnician,
        StaffRole::SoundEngineer,
        StaffRole::SetDesigner,
        StaffRole::CostumeDesigner,
        StaffRole::Actor,
        StaffRole::Director,
        StaffRole::PropsMaster,
        StaffRole::MakeupArtist,
        StaffRole::Usher,
        StaffRole::BoxOfficeClerk,
        StaffRole::ProductionAssistant,
        StaffRole::Choreographer,
        StaffRole::Dramaturg,
        StaffRole::FrontOfHouseManager,
    ];
}

/// Part a staff member plays in the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Involvement {
    Murderer,
    Victim,
    Bystander,
}

impl Involvement {
    /// Role the scenario pins for this involvement, if any.
    pub fn pinned_role(self) -> Option<StaffRole> {
        match self {
            Involvement::Murderer => Some(StaffRole::LightingTechnician),
            Involvement::Victim => Some(StaffRole::LeadActor),
            Involvement::Bystander => None,
        }
    }
}

impl fmt::Display for Involvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Involvement::Murderer => "murderer",
            Involvement::Victim => "victim",
            Involvement::Bystander => "bystander",
        };
        f.write_str(label)
    }
}
