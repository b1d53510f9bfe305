mod test_recording_lifecycle;
