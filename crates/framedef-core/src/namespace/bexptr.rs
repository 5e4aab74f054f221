//! Code pointers.
//!
//! Actions are referenced by mnemonic (`Look`, `Chase`, ...) with an
//! optional `A_` prefix. Their position in [`CODE_POINTERS`] is the stable
//! handle stored in frames and misc fields. The final entry, `NULL`, is the
//! "no action" pointer.

use framedef_index::{ChainIndex, NameKey};

/// Extra hash chains beyond one per pointer.
const CHAIN_SLACK: usize = 35;

/// Known code pointer mnemonics; `NULL` must stay last.
pub static CODE_POINTERS: &[&str] = &[
    "Light0", "WeaponReady", "Lower", "Raise", "Punch", "ReFire", "FirePistol", "Light1",
    "FireShotgun", "Light2", "FireShotgun2", "CheckReload", "OpenShotgun2", "LoadShotgun2",
    "CloseShotgun2", "FireCGun", "GunFlash", "FireMissile", "Saw", "FirePlasma", "BFGsound",
    "FireBFG", "BFGSpray", "Explode", "Pain", "PlayerScream", "RavenPlayerScream", "Fall",
    "XScream", "Look", "Chase", "FaceTarget", "PosAttack", "Scream", "SPosAttack", "VileChase",
    "VileStart", "VileTarget", "VileAttack", "StartFire", "Fire", "FireCrackle", "Tracer",
    "SkelWhoosh", "SkelFist", "SkelMissile", "FatRaise", "FatAttack1", "FatAttack2",
    "FatAttack3", "BossDeath", "CPosAttack", "CPosRefire", "TroopAttack", "SargAttack",
    "HeadAttack", "BruisAttack", "SkullAttack", "Metal", "SpidRefire", "BabyMetal",
    "BspiAttack", "Hoof", "CyberAttack", "PainAttack", "PainDie", "KeenDie", "BrainPain",
    "BrainScream", "BrainDie", "BrainAwake", "BrainSpit", "SpawnSound", "SpawnFly",
    "BrainExplode", "Detonate", "Mushroom", "Die", "Spawn", "Turn", "Face", "Scratch",
    "PlaySound", "RandomJump", "LineEffect", "Nailbomb", "SpawnAbove", "SpawnGlitter",
    "SpawnEx", "StartScript", "StartScriptNamed", "PlayerStartScript", "SetFlags", "UnSetFlags",
    "BetaSkullAttack", "GenRefire", "FireCustomBullets", "FirePlayerMissile",
    "CustomPlayerMelee", "GenTracer", "BFG11KHit", "BouncingBFG", "BFGBurst", "FireOldBFG",
    "KeepChasing", "Stop", "PlayerThunk", "MissileAttack", "MissileSpread", "BulletAttack",
    "HealthJump", "CounterJump", "CounterJumpEx", "CounterSwitch", "CounterSwitchEx",
    "SetCounter", "CopyCounter", "CounterOp", "CounterDiceRoll", "SetTics", "AproxDistance",
    "ShowMessage", "RandomWalk", "TargetJump", "ThingSummon", "KillChildren", "WeaponCtrJump",
    "WeaponCtrJumpEx", "WeaponCtrSwitch", "WeaponSetCtr", "WeaponCopyCtr", "WeaponCtrOp",
    "AmbientThinker", "SteamSpawn", "EjectCasing", "CasingThrust", "JumpIfNoAmmo",
    "CheckReloadEx", "DetonateEx", "MushroomEx", "HideThing", "UnHideThing", "RestoreArtifact",
    "RestoreSpecialThing1", "RestoreSpecialThing2", "SargAttack12", "SelfDestruct",
    "TurnProjectile", "SubtractAmmo", "PainNukeSpec", "SorcNukeSpec", "SpawnTeleGlitter",
    "SpawnTeleGlitter2", "AccelGlitter", "InitKeyGizmo", "MummyAttack", "MummyAttack2",
    "MummySoul", "HticDrop", "HticTracer", "MummyFX1Seek", "ContMobjSound", "ESound",
    "ClinkAttack", "GhostOff", "WizardAtk1", "WizardAtk2", "WizardAtk3", "SorZap", "SorRise",
    "SorDSph", "SorDExp", "SorDBon", "SorSightSnd", "Srcr2Decide", "Srcr2Attack", "BlueSpark",
    "GenWizard", "Sor2DthInit", "Sor2DthLoop", "HticExplode", "HticBossDeath", "PodPain",
    "RemovePod", "MakePod", "KnightAttack", "DripBlood", "BeastAttack", "BeastPuff",
    "SnakeAttack", "SnakeAttack2", "Sor1Chase", "Sor1Pain", "Srcr1Attack", "SorcererRise",
    "VolcanoSet", "VolcanoBlast", "VolcBallImpact", "MinotaurAtk1", "MinotaurDecide",
    "MinotaurAtk2", "MinotaurAtk3", "MinotaurCharge", "MntrFloorFire", "LichFire",
    "LichWhirlwind", "LichAttack", "WhirlwindSeek", "LichIceImpact", "LichFireGrow",
    "ImpChargeAtk", "ImpMeleeAtk", "ImpMissileAtk", "ImpDeath", "ImpXDeath1", "ImpXDeath2",
    "ImpExplode", "PlayerSkull", "FlameSnd", "ClearSkin", "PhoenixPuff", "FlameEnd",
    "FloatPuff", "StaffAttackPL1", "StaffAttackPL2", "FireGoldWandPL1", "FireGoldWandPL2",
    "FireMacePL1", "MacePL1Check", "MaceBallImpact", "MaceBallImpact2", "FireMacePL2",
    "DeathBallImpact", "FireCrossbowPL1", "FireCrossbowPL2", "BoltSpark", "FireBlasterPL1",
    "FireSkullRodPL1", "FirePhoenixPL1", "InitPhoenixPL2", "FirePhoenixPL2", "GauntletAttack",
    "HticArtiTele", "HticSpawnFireBomb", "AlertMonsters", "CheckPlayerDone", "FadeIn",
    "FadeOut", "JumpIfTargetInLOS", "PlaySoundEx", "SetSpecial", "SetTranslucent", "Jump",
    "SeekerMissile", "FogSpawn", "FogMove",
    "NULL",
];

/// Case-insensitive lookup over [`CODE_POINTERS`].
///
/// # Example
///
/// ```
/// use framedef_core::namespace::CodePointers;
///
/// let pointers = CodePointers::new();
/// let look = pointers.index_of("A_Look").unwrap();
/// assert_eq!(pointers.index_of("look"), Some(look));
/// assert_eq!(pointers.name(look), Some("Look"));
/// assert_eq!(pointers.index_of("A_"), None);
/// ```
#[derive(Debug, Clone)]
pub struct CodePointers {
    index: ChainIndex<NameKey>,
}

impl Default for CodePointers {
    fn default() -> Self {
        Self::new()
    }
}

impl CodePointers {
    /// Builds the lookup index.
    #[must_use]
    pub fn new() -> Self {
        let mut index = ChainIndex::with_chains(CODE_POINTERS.len() + CHAIN_SLACK);
        for (slot, name) in CODE_POINTERS.iter().enumerate() {
            let inserted = index.insert(slot, NameKey::new(*name));
            debug_assert!(inserted.is_ok(), "code pointer slot {slot} linked twice");
        }
        Self { index }
    }

    /// Looks up a mnemonic, ignoring an `A_` prefix.
    #[must_use]
    pub fn index_of(&self, mnemonic: &str) -> Option<usize> {
        let bare = match mnemonic.get(..2) {
            Some(prefix) if mnemonic.len() > 2 && prefix.eq_ignore_ascii_case("A_") => &mnemonic[2..],
            _ => mnemonic,
        };
        self.index.lookup(bare)
    }

    /// Returns the mnemonic at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&'static str> {
        CODE_POINTERS.get(index).copied()
    }

    /// Returns the index of the `NULL` pointer.
    #[must_use]
    pub fn null_index(&self) -> usize {
        CODE_POINTERS.len() - 1
    }

    /// Returns the number of pointers, `NULL` included.
    #[must_use]
    pub fn len(&self) -> usize {
        CODE_POINTERS.len()
    }

    /// Always false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        CODE_POINTERS.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pointer_is_reachable() {
        let pointers = CodePointers::new();
        for (i, name) in CODE_POINTERS.iter().enumerate() {
            assert_eq!(pointers.index_of(name), Some(i), "{name}");
        }
    }

    #[test]
    fn mnemonics_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for name in CODE_POINTERS {
            assert!(seen.insert(name.to_ascii_uppercase()), "{name} listed twice");
        }
    }

    #[test]
    fn null_is_last() {
        let pointers = CodePointers::new();
        assert_eq!(pointers.index_of("NULL"), Some(pointers.null_index()));
        assert_eq!(pointers.index_of("A_NULL"), Some(pointers.null_index()));
    }

    #[test]
    fn prefix_is_optional_and_case_insensitive() {
        let pointers = CodePointers::new();
        assert_eq!(pointers.index_of("a_chase"), pointers.index_of("Chase"));
        assert!(pointers.index_of("Chase").is_some());
        assert_eq!(pointers.index_of("A_NoSuchThing"), None);
    }
}
