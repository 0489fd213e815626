use log::debug;
use object::{Object, ObjectSection, SectionKind};
use thiserror::Error;

// Sections copied into a RAM image. Anything else (symbols, debug info,
// notes) never reaches memory.
pub const LOADED_SECTIONS: &[&str] = &[
    ".text",
    ".data",
    ".bss",
    ".rodata",
    ".sdata",
    ".sbss",
    ".init_array",
    ".fini_array",
];

#[derive(Debug, Error)]
pub enum ElfError {
    #[error("not a valid ELF file: {0}")]
    Parse(#[from] object::Error),

    #[error("section .text not found")]
    MissingText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'data> {
    pub name: String,
    pub addr: u64,
    pub size: u64,
    // None for NOBITS sections (.bss, .sbss), which occupy memory but no file
    // bytes.
    pub data: Option<&'data [u8]>,
}

impl Section<'_> {
    pub fn end(&self) -> u64 {
        self.addr.saturating_add(self.size)
    }
}

#[derive(Debug)]
pub struct ElfImage<'data> {
    pub sections: Vec<Section<'data>>,
}

impl<'data> ElfImage<'data> {
    pub fn parse(bytes: &'data [u8]) -> Result<ElfImage<'data>, ElfError> {
        let file = object::File::parse(bytes)?;

        let mut sections = vec![];
        for sec in file.sections() {
            // Compared as bytes: names of sections we skip needn't be UTF-8.
            let raw = sec.name_bytes()?;
            let Some(name) = LOADED_SECTIONS.iter().find(|n| n.as_bytes() == raw) else {
                continue;
            };

            let data = match sec.kind() {
                SectionKind::UninitializedData | SectionKind::UninitializedTls => None,
                _ => Some(sec.data()?),
            };
            debug!("ELF: {name} at {:#x}, {:#x} bytes", sec.address(), sec.size());
            sections.push(Section {
                name: (*name).to_owned(),
                addr: sec.address(),
                size: sec.size(),
                data,
            });
        }

        Ok(ElfImage { sections })
    }

    pub fn text_addr(&self) -> Result<u64, ElfError> {
        self.sections
            .iter()
            .find(|s| s.name == ".text")
            .map(|s| s.addr)
            .ok_or(ElfError::MissingText)
    }

    pub fn highest_addr(&self) -> u64 {
        self.sections.iter().map(Section::end).max().unwrap_or(0)
    }
}

////////////////////////////////////////////////////////////////////////////////

// Minimal little-endian ELF64 executable writer. Only used to build inputs for
// tests, here and in the integration tests crate.
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    pub struct TestSection<'a> {
        pub name: &'a str,
        pub addr: u64,
        pub data: &'a [u8],
        // Emitted as SHT_NOBITS with `data.len()` as its size.
        pub nobits: bool,
    }

    const EHDR_SIZE: usize = 64;
    const SHDR_SIZE: usize = 64;

    const SHT_PROGBITS: u32 = 1;
    const SHT_STRTAB: u32 = 3;
    const SHT_NOBITS: u32 = 8;
    const SHF_WRITE: u64 = 0x1;
    const SHF_ALLOC: u64 = 0x2;
    const SHF_EXECINSTR: u64 = 0x4;

    struct Shdr {
        name: u32,
        kind: u32,
        flags: u64,
        addr: u64,
        offset: u64,
        size: u64,
    }

    pub fn build_elf(sections: &[TestSection]) -> Vec<u8> {
        let mut shstrtab = vec![0u8];
        let mut body = vec![];
        let mut shdrs = vec![Shdr { name: 0, kind: 0, flags: 0, addr: 0, offset: 0, size: 0 }];

        for sec in sections {
            let name = shstrtab.len() as u32;
            shstrtab.extend_from_slice(sec.name.as_bytes());
            shstrtab.push(0);

            let offset = (EHDR_SIZE + body.len()) as u64;
            let (kind, flags) = if sec.nobits {
                (SHT_NOBITS, SHF_ALLOC | SHF_WRITE)
            } else if sec.name == ".text" {
                (SHT_PROGBITS, SHF_ALLOC | SHF_EXECINSTR)
            } else {
                (SHT_PROGBITS, SHF_ALLOC | SHF_WRITE)
            };
            if !sec.nobits {
                body.extend_from_slice(sec.data);
            }
            shdrs.push(Shdr {
                name,
                kind,
                flags,
                addr: sec.addr,
                offset,
                size: sec.data.len() as u64,
            });
        }

        let strtab_name = shstrtab.len() as u32;
        shstrtab.extend_from_slice(b".shstrtab\0");
        shdrs.push(Shdr {
            name: strtab_name,
            kind: SHT_STRTAB,
            flags: 0,
            addr: 0,
            offset: (EHDR_SIZE + body.len()) as u64,
            size: shstrtab.len() as u64,
        });
        body.extend_from_slice(&shstrtab);
        while body.len() % 8 != 0 {
            body.push(0);
        }

        let shoff = (EHDR_SIZE + body.len()) as u64;
        let shnum = shdrs.len() as u16;

        let mut out = Vec::with_capacity(shoff as usize + shdrs.len() * SHDR_SIZE);
        out.extend_from_slice(b"\x7fELF");
        out.extend_from_slice(&[2, 1, 1, 0]); // ELFCLASS64, little endian, EV_CURRENT, SysV
        out.extend_from_slice(&[0; 8]);
        out.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
        out.extend_from_slice(&243u16.to_le_bytes()); // EM_RISCV
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&sections.first().map_or(0, |s| s.addr).to_le_bytes()); // e_entry
        out.extend_from_slice(&0u64.to_le_bytes()); // e_phoff
        out.extend_from_slice(&shoff.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
        out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
        out.extend_from_slice(&56u16.to_le_bytes()); // e_phentsize
        out.extend_from_slice(&0u16.to_le_bytes()); // e_phnum
        out.extend_from_slice(&(SHDR_SIZE as u16).to_le_bytes());
        out.extend_from_slice(&shnum.to_le_bytes());
        out.extend_from_slice(&(shnum - 1).to_le_bytes()); // e_shstrndx
        assert_eq!(out.len(), EHDR_SIZE);

        out.extend_from_slice(&body);

        for sh in &shdrs {
            out.extend_from_slice(&sh.name.to_le_bytes());
            out.extend_from_slice(&sh.kind.to_le_bytes());
            out.extend_from_slice(&sh.flags.to_le_bytes());
            out.extend_from_slice(&sh.addr.to_le_bytes());
            out.extend_from_slice(&sh.offset.to_le_bytes());
            out.extend_from_slice(&sh.size.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes()); // sh_link
            out.extend_from_slice(&0u32.to_le_bytes()); // sh_info
            out.extend_from_slice(&1u64.to_le_bytes()); // sh_addralign
            out.extend_from_slice(&0u64.to_le_bytes()); // sh_entsize
        }

        out
    }
}

////////////////////////////////////////////////////////////////////////////////
