//! List the storage volumes of a device: the platform's default
//! volume and the removable media found in the mount table.

mod builder;
mod classify;
mod dedup;
mod error;
mod mount_entry;
mod mount_table;
mod platform;
mod scan_options;
mod storage_list;
mod sys;
mod volume;

pub use {
    builder::StorageListBuilder,
    classify::{is_external_candidate, is_relevant, is_valid_mount_point},
    dedup::{is_listed, same_volume},
    error::{Error, Result},
    mount_entry::{parse_mount_table, MountEntry},
    mount_table::read_mount_table,
    platform::{
        AcceptAll, ApiTier, Capabilities, DefaultVolumeSource, EnglishLabels, EnvDefaultVolume,
        FixedDefaultVolume, LabelSource, MountPointPolicy, NoDefaultVolume, StorageState,
    },
    scan_options::ScanOptions,
    storage_list::StorageList,
    volume::VolumeInfo,
};
