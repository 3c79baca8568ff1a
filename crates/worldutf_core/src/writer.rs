//! World UTF text serialization
//!
//! A World UTF file is a single map-name line followed by seven sections in
//! a fixed order. Each section opens with a three-line `###` banner and a
//! count line, then one record per entity. Numbers are space separated on
//! one line per vector or matrix; strings take a line each.
//!
//! ```text
//! level1
//! ###
//! ### STATIC MODELS
//! ###
//! 1 # number of static models
//! models\crate.mdl
//! ...
//! ```

use std::io::{self, Write};

use worldutf_math::{Mat4, Quat, Vec3};

use crate::entities::{
    CameraAnimation, CatalogKind, DoorController, ModelCatalogEntry, ModelInstance, SoundEntry,
    WorldExport,
};

/// Output sections, in file order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    StaticModels,
    DynamicModels,
    Sounds,
    StaticModelInstances,
    DynamicModelInstances,
    CameraAnimations,
    DoorControllers,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::StaticModels,
        Section::DynamicModels,
        Section::Sounds,
        Section::StaticModelInstances,
        Section::DynamicModelInstances,
        Section::CameraAnimations,
        Section::DoorControllers,
    ];

    /// Banner title
    pub fn title(self) -> &'static str {
        match self {
            Section::StaticModels => "STATIC MODELS",
            Section::DynamicModels => "DYNAMIC MODELS",
            Section::Sounds => "SOUNDS",
            Section::StaticModelInstances => "STATIC MODEL INSTANCES",
            Section::DynamicModelInstances => "DYNAMIC MODEL INSTANCES",
            Section::CameraAnimations => "CAMERA ANIMATIONS",
            Section::DoorControllers => "DOOR CONTROLLERS",
        }
    }
}

/// Line-oriented primitive writer
pub struct RecordWriter<W: Write> {
    out: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_int(&mut self, v: impl Into<i64>) -> io::Result<()> {
        writeln!(self.out, "{}", v.into())
    }

    pub fn write_float(&mut self, v: f32) -> io::Result<()> {
        writeln!(self.out, "{}", v)
    }

    pub fn write_bool(&mut self, v: bool) -> io::Result<()> {
        self.write_int(v as i64)
    }

    pub fn write_string(&mut self, s: &str) -> io::Result<()> {
        writeln!(self.out, "{}", s)
    }

    pub fn write_vec3(&mut self, v: Vec3) -> io::Result<()> {
        writeln!(self.out, "{} {} {}", v.x, v.y, v.z)
    }

    /// Quaternion as `w x y z`
    pub fn write_quat(&mut self, q: Quat) -> io::Result<()> {
        writeln!(self.out, "{} {} {} {}", q.w, q.x, q.y, q.z)
    }

    /// All 16 components, row by row, on one line
    pub fn write_mat4(&mut self, m: &Mat4) -> io::Result<()> {
        let line = m
            .iter()
            .flatten()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(self.out, "{}", line)
    }

    /// Three-line `###` banner
    pub fn write_section(&mut self, section: Section) -> io::Result<()> {
        writeln!(self.out, "###")?;
        writeln!(self.out, "### {}", section.title())?;
        writeln!(self.out, "###")
    }

    /// `<n> # <label>`
    pub fn write_count(&mut self, n: usize, label: &str) -> io::Result<()> {
        writeln!(self.out, "{} # {}", n, label)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Serialize a complete world
pub fn write_world<W: Write>(out: W, map_name: &str, world: &WorldExport) -> io::Result<W> {
    let mut w = RecordWriter::new(out);
    w.write_string(map_name)?;

    for section in Section::ALL {
        w.write_section(section)?;
        match section {
            Section::StaticModels => write_catalog(&mut w, section, world.catalog(CatalogKind::Static))?,
            Section::DynamicModels => write_catalog(&mut w, section, world.catalog(CatalogKind::Dynamic))?,
            Section::Sounds => write_sounds(&mut w, section, &world.sounds)?,
            Section::StaticModelInstances => {
                write_instances(&mut w, section, world.instances(CatalogKind::Static))?
            }
            Section::DynamicModelInstances => {
                write_instances(&mut w, section, world.instances(CatalogKind::Dynamic))?
            }
            Section::CameraAnimations => write_camera_animations(&mut w, section, &world.camera_animations)?,
            Section::DoorControllers => write_door_controllers(&mut w, section, &world.door_controllers)?,
        }
    }

    w.flush()?;
    Ok(w.into_inner())
}

fn count_label(section: Section) -> String {
    format!("number of {}", section.title().to_lowercase())
}

fn write_catalog<W: Write>(
    w: &mut RecordWriter<W>,
    section: Section,
    entries: &[ModelCatalogEntry],
) -> io::Result<()> {
    w.write_count(entries.len(), &count_label(section))?;
    for entry in entries {
        w.write_string(&entry.reference())?;
    }
    Ok(())
}

fn write_sounds<W: Write>(w: &mut RecordWriter<W>, section: Section, sounds: &[SoundEntry]) -> io::Result<()> {
    w.write_count(sounds.len(), &count_label(section))?;
    for sound in sounds {
        w.write_string(&sound.reference())?;
    }
    Ok(())
}

fn write_instances<W: Write>(
    w: &mut RecordWriter<W>,
    section: Section,
    instances: &[ModelInstance],
) -> io::Result<()> {
    w.write_count(instances.len(), &count_label(section))?;
    for instance in instances {
        w.write_int(instance.model)?;
        w.write_vec3(instance.position)?;
        w.write_mat4(&instance.rotation)?;
    }
    Ok(())
}

fn write_camera_animations<W: Write>(
    w: &mut RecordWriter<W>,
    section: Section,
    animations: &[CameraAnimation],
) -> io::Result<()> {
    w.write_count(animations.len(), &count_label(section))?;
    for animation in animations {
        w.write_string(&animation.name)?;
        w.write_vec3(animation.position)?;
        w.write_mat4(&animation.rotation)?;
        w.write_int(animation.start)?;
        w.write_count(animation.markers.len(), "of markers")?;
        for marker in &animation.markers {
            w.write_vec3(marker.position)?;
            w.write_mat4(&marker.rotation)?;
            w.write_vec3(marker.euler)?;
            w.write_int(marker.index)?;
            w.write_float(marker.speed)?;
            w.write_bool(marker.interpolate_speed)?;
            w.write_float(marker.fovy)?;
            w.write_bool(marker.interpolate_fovy)?;
        }
    }
    Ok(())
}

fn write_door_controllers<W: Write>(
    w: &mut RecordWriter<W>,
    section: Section,
    controllers: &[DoorController],
) -> io::Result<()> {
    w.write_count(controllers.len(), &count_label(section))?;
    for dc in controllers {
        w.write_string(&dc.name)?;
        w.write_vec3(dc.bbox.position)?;
        w.write_quat(dc.bbox.rotation)?;
        w.write_vec3(dc.bbox.half_extents)?;
        // the door reference is not part of the record
        w.write_string(&dc.anim_default)?;
        w.write_string(&dc.anim_enter)?;
        w.write_string(&dc.anim_leave)?;
        w.write_string(&dc.sound_enter)?;
        w.write_string(&dc.sound_leave)?;
    }
    Ok(())
}
