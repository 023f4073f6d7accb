// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed catalogues: enumerated string tokens that are wire contracts.
//!
//! Downstream generation prompts embed these tokens verbatim, so parsing
//! is exact and case-sensitive. A token outside its catalogue is an
//! error, never coerced to a default.

use thiserror::Error;

/// A token that is not part of a closed catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{token}` is not a valid {catalogue}")]
pub struct UnknownToken {
    pub catalogue: &'static str,
    pub token: String,
}

/// A closed set of string tokens.
pub trait Catalogue: Sized + Copy + 'static {
    /// Human-readable catalogue name used in violations.
    const NAME: &'static str;

    fn all() -> &'static [Self];

    fn token(self) -> &'static str;

    fn parse_token(token: &str) -> Result<Self, UnknownToken> {
        Self::all()
            .iter()
            .copied()
            .find(|v| v.token() == token)
            .ok_or_else(|| UnknownToken {
                catalogue: Self::NAME,
                token: token.to_string(),
            })
    }

    fn tokens() -> Vec<&'static str> {
        Self::all().iter().map(|v| v.token()).collect()
    }
}

macro_rules! catalogue {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::catalog::Catalogue for $name {
            const NAME: &'static str = $label;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::catalog::Catalogue::token(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::catalog::UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::catalog::Catalogue>::parse_token(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::catalog::Catalogue::token(*self))
            }
        }
    };
}

// --- Conversation ---

catalogue! {
    /// Who wrote a chat message.
    pub enum MessageAuthor as "message author" {
        User => "user",
        Ai => "ai",
        System => "system",
    }
}

catalogue! {
    /// Tool mode attached to a chat request.
    pub enum AiTool as "AI tool" {
        None => "none",
        WebSearch => "web_search",
        DeepResearch => "deep_research",
        CodeWriter => "code_writer",
    }
}

catalogue! {
    /// Requested transformation of a generated code block.
    pub enum CodeModification as "code modification" {
        Review => "review",
        Fix => "fix",
        Logs => "logs",
        Comments => "comments",
        Translate => "translate",
        AddFeature => "add_feature",
    }
}

catalogue! {
    /// Shape tag of a structured chart specification.
    pub enum ChartKind as "chart kind" {
        Bar => "bar",
        Line => "line",
        Pie => "pie",
        Opaque => "opaque",
    }
}

catalogue! {
    /// Action proposed by a smart suggestion.
    pub enum SmartSuggestionAction as "smart suggestion action" {
        CreateCodeSnippet => "CREATE_CODE_SNIPPET",
        GenerateImage => "GENERATE_IMAGE",
        StartRoleplay => "START_ROLEPLAY",
        StartStory => "START_STORY",
        AddToMemory => "ADD_TO_MEMORY",
        SearchChats => "SEARCH_CHATS",
        None => "NONE",
    }
}

// --- Settings ---

catalogue! {
    pub enum Theme as "theme" {
        Light => "light",
        Dark => "dark",
        System => "system",
    }
}

catalogue! {
    pub enum BackgroundType as "background type" {
        Aurora => "aurora",
        Gradient => "gradient",
        Image => "image",
        Solid => "solid",
        Video => "video",
    }
}

catalogue! {
    pub enum AnimationIntensity as "animation intensity" {
        Subtle => "subtle",
        Default => "default",
        Playful => "playful",
    }
}

catalogue! {
    pub enum ModelName as "model name" {
        Gemini25Flash => "gemini-2.5-flash",
    }
}

catalogue! {
    pub enum ButtonAlign as "button alignment" {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

catalogue! {
    /// Content rating of the active generation model.
    pub enum ContentModel as "content model" {
        Safe => "safe",
        Nsfw => "nsfw",
        Extreme => "extreme",
    }
}

// --- Story writer and role play ---

catalogue! {
    pub enum StoryTone as "story tone" {
        Neutral => "General/Neutral",
        DarkGritty => "Dark & Gritty",
        Humorous => "Humorous & Lighthearted",
        Epic => "Epic & Grandiose",
        Mysterious => "Mysterious & Suspenseful",
        Romantic => "Romantic & Emotional",
    }
}

catalogue! {
    pub enum StoryPov as "story point of view" {
        FirstPerson => "First Person",
        ThirdPersonLimited => "Third Person Limited",
        ThirdPersonOmniscient => "Third Person Omniscient",
    }
}

catalogue! {
    pub enum StorySceneType as "story scene type" {
        GeneralNarrative => "General Narrative",
        Action => "Action Scene",
        Dialogue => "Dialogue-Heavy Scene",
        Introspective => "Introspective Scene",
        WorldBuilding => "World-Building Exposition",
    }
}

catalogue! {
    pub enum StoryMode as "story mode" {
        Interactive => "interactive",
        OnePage => "one-page",
        Linear => "linear",
    }
}

catalogue! {
    pub enum RolePlayCharacterType as "role-play character type" {
        Custom => "Custom",
        Anime => "Anime Character",
        Movie => "Movie Character",
        VideoGame => "Video Game Character",
        Historical => "Historical Figure",
        Fantasy => "Fantasy Character",
        SciFi => "Sci-Fi Character",
        Superhero => "Superhero",
        Villain => "Villain",
        Sister => "Sister",
        Brother => "Brother",
        Mother => "Mother",
        Father => "Father",
        Friend => "Friend",
        Rival => "Rival",
        Mentor => "Mentor",
        Teacher => "Teacher",
        Boss => "Boss",
        Celebrity => "Celebrity",
    }
}

// --- Passion Weaver ---

catalogue! {
    pub enum PassionTone as "passion weaver tone" {
        Romantic => "Romantic & Sensual",
        Rough => "Rough & Dominant",
        Submissive => "Submissive & Pleading",
        Experimental => "Experimental & Kinky",
        Playful => "Humorous & Playful",
    }
}

catalogue! {
    pub enum CharacterGender as "character gender" {
        Man => "Man",
        Woman => "Woman",
        NonBinary => "Non-binary",
    }
}

catalogue! {
    /// Narrative tendency tracked by cumulative alignment scores.
    pub enum Alignment as "alignment" {
        Good => "good",
        Bad => "bad",
        Lust => "lust",
        Force => "force",
        Pleasure => "pleasure",
        Happy => "happy",
        Safety => "safety",
    }
}

// --- Workflows ---

catalogue! {
    pub enum WorkflowStepKind as "workflow step type" {
        GenerateText => "generate_text",
        GenerateImage => "generate_image",
        SummarizeText => "summarize_text",
        ResearchTopic => "research_topic",
        GenerateWebsite => "generate_website",
        GeneratePdf => "generate_pdf",
        GenerateSlides => "generate_slides",
    }
}

catalogue! {
    pub enum WorkflowOutputKind as "workflow output type" {
        Text => "text",
        Image => "image",
        Website => "website",
        Pdf => "pdf",
        Slides => "slides",
    }
}

// --- Companion profiles ---

catalogue! {
    /// Companion personality. Standard and role-play personalities are
    /// available to every profile; explicit ones are meant for 18+ profiles.
    pub enum Personality as "companion personality" {
        Default => "Default",
        Tsundere => "Tsundere",
        YandereNonExplicit => "Yandere (Non-Explicit)",
        Deredere => "Deredere",
        Kuudere => "Kuudere",
        Dandere => "Dandere",
        Shy => "Shy",
        Bubbly => "Bubbly",
        Confident => "Confident",
        Sarcastic => "Sarcastic",
        GamerGirl => "Gamer Girl",
        Goth => "Goth",
        Tomboy => "Tomboy",
        ValleyGirl => "Valley Girl",
        Artist => "Artist",
        Musician => "Musician",
        Athlete => "Athlete",
        Scientist => "Scientist",
        Librarian => "Librarian",
        Intellectual => "Intellectual",
        Airhead => "Airhead",
        Clumsy => "Clumsy",
        Energetic => "Energetic",
        Calm => "Calm",
        Teacher => "Teacher",
        Student => "Student",
        Sister => "Sister",
        Mother => "Mother",
        ChildhoodFriend => "Childhood Friend",
        Rival => "Rival",
        Mentor => "Mentor",
        Boss => "Boss",
        Celebrity => "Celebrity",
        Stalker => "Stalker",
        Princess => "Princess",
        Knight => "Knight",
        Vampire => "Vampire",
        Elf => "Elf",
        Demon => "Demon",
        Angel => "Angel",
        Android => "Android",
        SecretAgent => "Secret Agent",
        MafiaBoss => "Mafia Boss",
        Doctor => "Doctor",
        Nurse => "Nurse",
        PoliceOfficer => "Police Officer",
        Maid => "Maid",
        Queen => "Queen",
        Dominant => "Dominant",
        Submissive => "Submissive",
        PassionateLover => "Passionate Lover",
        Teasing => "Teasing",
        Exhibitionist => "Exhibitionist",
        YandereExplicit => "Yandere (Explicit)",
        Brat => "Brat",
        Sadist => "Sadist",
        Masochist => "Masochist",
        Nymphomaniac => "Nymphomaniac",
        TsundereExplicit => "Tsundere (Explicit)",
        KuudereExplicit => "Kuudere (Explicit)",
        Pet => "Pet",
        Succubus => "Succubus",
        Milf => "Milf",
    }
}

impl Personality {
    pub fn is_explicit(self) -> bool {
        (self as usize) >= (Personality::Dominant as usize)
    }
}

catalogue! {
    pub enum RelationshipStatus as "relationship status" {
        JustMet => "Just Met",
        Friends => "Friends",
        BestFriends => "Best Friends",
        Roommates => "Roommates",
        Dating => "Dating",
        Married => "Married",
        ItsComplicated => "It's Complicated",
        ComplicatedHistory => "Complicated History",
        Rivals => "Rivals",
        ForbiddenLove => "Forbidden Love",
        Exes => "Exes",
        PenPals => "Pen Pals",
        OnlineFriends => "Online Friends",
        Colleagues => "Colleagues",
        FriendsWithBenefits => "FWB (Casual)",
        SecretAffair => "Secret Affair",
        MasterPet => "Master/Pet",
        EnemiesToLovers => "Enemies to Lovers",
        OneNightStand => "One-Night Stand",
        StepSiblings => "Step-siblings",
        StudentTeacher => "Student/Teacher",
        DaddyBabygirl => "Daddy/Babygirl",
        GoddessWorshipper => "Goddess/Worshipper",
        CaptorCaptive => "Captor/Captive",
        SugarBabyDaddy => "Sugar Baby/Daddy",
        StrangersWithASecret => "Strangers with a Secret",
        BreedingPartner => "Breeding Partner",
    }
}

impl RelationshipStatus {
    pub fn is_explicit(self) -> bool {
        (self as usize) >= (RelationshipStatus::FriendsWithBenefits as usize)
    }
}

// --- Emotion meter and interaction studio ---

catalogue! {
    pub enum Emotion as "emotion" {
        Happiness => "happiness",
        Sadness => "sadness",
        Love => "love",
        Surprise => "surprise",
        Shyness => "shyness",
        Beauty => "beauty",
        Cuteness => "cuteness",
        Horror => "horror",
        Loneliness => "loneliness",
        Horniness => "horniness",
        Sexiness => "sexiness",
        Hotness => "hotness",
        Wetness => "wetness",
        Nudity => "nudity",
    }
}

impl Emotion {
    pub fn is_explicit(self) -> bool {
        (self as usize) >= (Emotion::Horniness as usize)
    }
}

catalogue! {
    pub enum StudioCategory as "studio category" {
        PrimaryInteractions => "Primary Interactions",
        BodyPartsInUse => "Body Parts in Use",
        Positions => "Sexual Positions",
        TechniquesAndActs => "Techniques & Acts",
        ToysAndProps => "Toys & Props",
        ErogenousSpots => "Erogenous Spots",
        PainAndPleasure => "Pain & Pleasure Play",
        RoughAndPrimal => "Rough & Primal Sex",
        DominanceAndSubmission => "Dominance & Submission",
        HumiliationAndDegradation => "Humiliation & Degradation",
        ConsensualNonConsent => "Consensual Non-Consent (CNC)",
        ExtremeKinks => "Extreme Kinks & Taboo",
    }
}

impl StudioCategory {
    pub fn is_extreme(self) -> bool {
        (self as usize) >= (StudioCategory::PainAndPleasure as usize)
    }
}

/// Scale of the per-topic studio ratings (pleasure, spice, intimacy, ...).
pub const STUDIO_RATING_RANGE: std::ops::RangeInclusive<u8> = 0..=10;

/// Scale of studio topic difficulty.
pub const STUDIO_DIFFICULTY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

// --- Routing ---

catalogue! {
    /// Application screen identifiers.
    pub enum View as "view" {
        Chat => "chat",
        GemsList => "gemsList",
        GemEditor => "gemEditor",
        Settings => "settings",
        Memory => "memory",
        ImageGeneration => "imageGeneration",
        ImageEditor => "imageEditor",
        Webcam => "webcam",
        StoryWriter => "storyWriter",
        RolePlay => "rolePlay",
        Bookmarks => "bookmarks",
        CodeCollection => "codeCollection",
        CodeEditor => "codeEditor",
        WorkflowsList => "workflowsList",
        WorkflowEditor => "workflowEditor",
        WorkflowRunner => "workflowRunner",
        DataVisualizer => "dataVisualizer",
        AiGirlfriendList => "aiGirlfriendList",
        AiGirlfriendEditor => "aiGirlfriendEditor",
        AiGirlfriendChat => "aiGirlfriendChat",
        MediaAnalysis => "mediaAnalysis",
        Storage => "storage",
        PassionWeaverList => "passionWeaverList",
        PassionWeaverEditor => "passionWeaverEditor",
        PassionWeaverStory => "passionWeaverStory",
        AppIdeaGenerator => "appIdeaGenerator",
        ObjectOfDesire => "objectOfDesire",
        AnatomyExplorer => "anatomyExplorer",
        LiveTalk => "liveTalk",
        FunZone => "funZone",
        FunZoneCategory => "funZoneCategory",
        FunZoneTopic => "funZoneTopic",
        EighteenPlusTalk => "eighteenPlusTalk",
        Shortcuts => "shortcuts",
        SexualProfile => "sexualProfile",
    }
}
