// Builds small PDFs in memory so the tests need no fixture files.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{DynamicImage, Rgb, RgbImage};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Write};

pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    pages_resources: Option<Dictionary>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            pages_resources: None,
        }
    }

    /// Add an image XObject stream and return its id.
    pub fn image(&mut self, dict: Dictionary, content: Vec<u8>) -> ObjectId {
        self.doc.add_object(Stream::new(dict, content))
    }

    pub fn jpeg_image(&mut self, width: u32, height: u32) -> ObjectId {
        let dict = image_dict(width, height, "DeviceRGB", Some("DCTDecode"));
        self.image(dict, encode(solid_rgb(width, height), image::ImageFormat::Jpeg))
    }

    pub fn flate_rgb_image(&mut self, width: u32, height: u32) -> ObjectId {
        let pixels = vec![90u8; (width * height * 3) as usize];
        let dict = image_dict(width, height, "DeviceRGB", Some("FlateDecode"));
        self.image(dict, zlib(&pixels))
    }

    pub fn corrupt_flate_image(&mut self, width: u32, height: u32) -> ObjectId {
        let dict = image_dict(width, height, "DeviceRGB", Some("FlateDecode"));
        self.image(dict, b"\x00\x01garbage that will never inflate".repeat(8))
    }

    /// A Form XObject whose resources reference `nested`.
    pub fn form(&mut self, nested: &[(&str, ObjectId)]) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
            "Resources" => dictionary! { "XObject" => xobject_dict(nested) },
        };
        self.doc.add_object(Stream::new(dict, b"q Q".to_vec()))
    }

    /// Add a page whose `/Resources/XObject` lists `xobjects` in order.
    pub fn page(&mut self, xobjects: &[(&str, ObjectId)]) -> ObjectId {
        let resources = dictionary! { "XObject" => xobject_dict(xobjects) };
        self.page_with(Some(resources.into()))
    }

    /// Add a page with the given `/Resources` value (or none at all).
    pub fn page_with(&mut self, resources: Option<Object>) -> ObjectId {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        if let Some(resources) = resources {
            page.set("Resources", resources);
        }
        let id = self.doc.add_object(page);
        self.kids.push(id.into());
        id
    }

    /// Put `/Resources` on the page tree node so pages inherit it.
    pub fn inherited_resources(&mut self, xobjects: &[(&str, ObjectId)]) {
        self.pages_resources = Some(dictionary! { "XObject" => xobject_dict(xobjects) });
    }

    /// Store an arbitrary object and return its id.
    pub fn object(&mut self, object: Object) -> ObjectId {
        self.doc.add_object(object)
    }

    pub fn finish(mut self) -> Vec<u8> {
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids.clone(),
            "Count" => Object::Integer(self.kids.len() as i64),
        };
        if let Some(resources) = self.pages_resources.take() {
            pages.set("Resources", resources);
        }
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

pub fn image_dict(width: u32, height: u32, color_space: &str, filter: Option<&str>) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => Object::Integer(i64::from(width)),
        "Height" => Object::Integer(i64::from(height)),
        "ColorSpace" => color_space,
        "BitsPerComponent" => Object::Integer(8),
    };
    if let Some(filter) = filter {
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    }
    dict
}

pub fn xobject_dict(entries: &[(&str, ObjectId)]) -> Dictionary {
    let mut dict = Dictionary::new();
    for (name, id) in entries {
        dict.set(*name, Object::Reference(*id));
    }
    dict
}

pub fn solid_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])))
}

pub fn encode(img: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}
