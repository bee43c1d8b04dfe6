/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    Keelstone boot emulator: programs images into an in-memory flash device,
    provisions fuse digests, and runs the ROM boot flow against software
    peripheral models. Exits 0 when an image launches; otherwise the process
    exit code carries the low byte of the ROM error code.

--*/

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use clap_num::maybe_hex;
use emulator_periph::{
    EmuCtrl, EmulatedVault, FuseBank, HaltPort, JitterEngine, JumpPort, Sha256Engine,
    StdoutConsole,
};
use keelstone_config::{BootConfig, BootSlotConfig, SlotId};
use keelstone_image::{payload_digest, Digest, ImageHeader, DIGEST_LEN};
use keelstone_rom::flash::SimpleFlash;
use keelstone_rom::hil::FlashStorage;
use keelstone_rom::{BootParams, GlitchPlan, RomEnv, VerifyCheck};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};
use zerocopy::FromBytes;

/// Emulated flash device size.
const FLASH_CAPACITY: usize = 0x000A_0000;

const PRIMARY_SLOT: BootSlotConfig = BootSlotConfig {
    id: SlotId::Primary,
    name: "primary",
    base: 0x0001_0000,
    size: 0x0004_0000,
};

const BACKUP_SLOT: BootSlotConfig = BootSlotConfig {
    id: SlotId::Backup,
    name: "backup",
    base: 0x0005_0000,
    size: 0x0004_0000,
};

/// Flash region standing in for vault-held secrets.
const SECRET_BASE: usize = 0x0009_0000;
const SECRET_LEN: usize = 0x1000;

#[derive(Parser)]
#[command(name = "keelstone-emulator")]
#[command(about = "Runs the Keelstone boot ROM against emulated devices")]
struct Args {
    /// Image file programmed into the primary slot
    #[arg(long)]
    primary_image: PathBuf,

    /// Image file programmed into the backup slot; the slot reads as erased
    /// when absent
    #[arg(long)]
    backup_image: Option<PathBuf>,

    /// Reference digest fused for the primary slot, 64 hex chars. Defaults
    /// to the digest of the primary image payload.
    #[arg(long)]
    fuse_digest_primary: Option<String>,

    /// Reference digest fused for the backup slot, 64 hex chars. Defaults to
    /// the digest of the backup image payload when one is given.
    #[arg(long)]
    fuse_digest_backup: Option<String>,

    /// Seed for the delay randomizer; OS entropy when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Flip the observed outcome of the verification check at this index
    /// (0..=6), modeling a single injected fault
    #[arg(long)]
    glitch_check: Option<u8>,

    /// Replace the verification status word with this value, modeling a
    /// corrupted status transfer
    #[arg(long, value_parser = maybe_hex::<u32>)]
    forge_status: Option<u32>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_digest(text: &str) -> Result<Digest> {
    let bytes = hex::decode(text).context("fuse digest is not valid hex")?;
    let bytes: [u8; DIGEST_LEN] = bytes
        .try_into()
        .map_err(|_| anyhow!("fuse digest must be {DIGEST_LEN} bytes"))?;
    Ok(Digest(bytes))
}

/// Digest of the payload carried by an image file, used when no explicit
/// fuse value is given.
fn file_payload_digest(image: &[u8], path: &Path) -> Result<Digest> {
    if image.len() < ImageHeader::SIZE {
        bail!("{} is shorter than an image header", path.display());
    }
    let header = ImageHeader::read_from_bytes(&image[..ImageHeader::SIZE])
        .map_err(|_| anyhow!("{} has an unreadable header", path.display()))?;
    let payload = image
        .get(ImageHeader::SIZE..ImageHeader::SIZE + header.length as usize)
        .ok_or_else(|| anyhow!("{} is truncated", path.display()))?;
    Ok(payload_digest(payload))
}

fn program_slot(flash: &SimpleFlash, slot: &BootSlotConfig, path: &Path) -> Result<Vec<u8>> {
    let image = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if image.len() > slot.size as usize {
        bail!(
            "{} does not fit the {} slot ({} > {} bytes)",
            path.display(),
            slot.name,
            image.len(),
            slot.size
        );
    }
    flash
        .write(&image, slot.base as usize)
        .map_err(|e| anyhow!("programming {} slot: {e:?}", slot.name))?;
    Ok(image)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let flash = SimpleFlash::new(Box::leak(vec![0u8; FLASH_CAPACITY].into_boxed_slice()));

    let primary = program_slot(&flash, &PRIMARY_SLOT, &args.primary_image)?;
    let backup = args
        .backup_image
        .as_deref()
        .map(|path| program_slot(&flash, &BACKUP_SLOT, path))
        .transpose()?;

    let mut fuses = FuseBank::new();
    let primary_fuse = match &args.fuse_digest_primary {
        Some(text) => parse_digest(text)?,
        None => file_payload_digest(&primary, &args.primary_image)?,
    };
    fuses.provision(SlotId::Primary, primary_fuse);
    match (&args.fuse_digest_backup, &backup) {
        (Some(text), _) => fuses.provision(SlotId::Backup, parse_digest(text)?),
        (None, Some(image)) => {
            let path = args.backup_image.as_deref().unwrap_or(Path::new("backup"));
            fuses.provision(SlotId::Backup, file_payload_digest(image, path)?);
        }
        (None, None) => {}
    }

    let glitch = GlitchPlan {
        flip_check: match args.glitch_check {
            Some(index) => Some(
                VerifyCheck::from_index(index)
                    .ok_or_else(|| anyhow!("--glitch-check takes an index in 0..=6"))?,
            ),
            None => None,
        },
        forge_status: args.forge_status,
    };

    let mut engine = Sha256Engine::new(fuses);
    let mut jitter = match args.seed {
        Some(seed) => JitterEngine::seeded(seed),
        None => JitterEngine::from_entropy(),
    };
    let mut vault = EmulatedVault::new(&flash, SECRET_BASE, SECRET_LEN);
    vault.provision();
    let mut ctrl = EmuCtrl::new();

    romcon::set_console(Box::leak(Box::new(StdoutConsole)));

    let config = BootConfig {
        primary: PRIMARY_SLOT,
        backup: Some(BACKUP_SLOT),
    };
    let mut params = BootParams::new(&config);
    params.glitch = glitch;

    let mut env = RomEnv {
        flash: &flash,
        digest: &mut engine,
        jitter: &mut jitter,
        vault: &mut vault,
        ctrl: &mut ctrl,
    };

    keelstone_rom::boot(&mut env, &params, &mut JumpPort, &mut HaltPort)
}
